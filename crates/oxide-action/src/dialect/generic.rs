//! Generic SQL dialect.

use super::{Dialect, DialectKind};

/// ANSI SQL without optional features.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Generic
    }
}
