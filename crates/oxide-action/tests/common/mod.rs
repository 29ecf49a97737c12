#![allow(dead_code)]

use oxide_action::prelude::*;

/// Dialect whose escaping and type rendering are visible in the output.
///
/// Requires an explicit `NULL` keyword and has no auto-increment support.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerDialect;

impl Dialect for MarkerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Generic
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("<escaped:{name}>")
    }

    fn data_type(&self, description: &str, _auto_increment: bool) -> String {
        format!("<rendered:{description}>")
    }

    fn requires_explicit_null(&self) -> bool {
        true
    }
}

pub fn execute(registry: &LogicRegistry, dialect: &dyn Dialect, action: &Action) -> Vec<String> {
    registry
        .execute(action, &Scope::new(dialect))
        .unwrap_or_else(|e| panic!("Failed to execute {action:?}: {e}"))
        .into_iter()
        .map(Sql::into_string)
        .collect()
}

pub fn execute_err(registry: &LogicRegistry, dialect: &dyn Dialect, action: &Action) -> ActionError {
    registry
        .execute(action, &Scope::new(dialect))
        .expect_err(&format!("Expected failure for {action:?}"))
}

pub fn validation_errors(err: &ActionError) -> &ValidationErrors {
    err.validation_errors()
        .unwrap_or_else(|| panic!("Expected validation error, got {err:?}"))
}
