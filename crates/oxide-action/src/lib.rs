//! Dialect-aware schema change actions.
//!
//! `oxide-action` turns abstract descriptions of schema changes into SQL for
//! a specific database:
//! - An [`Action`](action::Action) describes *what* should change
//! - A [`Dialect`](dialect::Dialect) answers capability questions and spells
//!   names and types
//! - An [`ActionLogic`](logic::ActionLogic) validates one action kind and
//!   renders it, either directly or by delegating to further actions
//! - The [`LogicRegistry`](registry::LogicRegistry) picks the most specific
//!   logic for each action and expands delegations into ordered SQL
//!
//! # Example
//!
//! ```rust
//! use oxide_action::prelude::*;
//!
//! let registry = LogicRegistry::default();
//! let dialect = SqliteDialect::new();
//! let action = Action::add_columns("users", vec![ColumnDefinition::new("age", "integer")]);
//!
//! let statements = registry.execute(&action, &Scope::new(&dialect)).unwrap();
//! assert_eq!(
//!     statements[0].as_str(),
//!     "ALTER TABLE \"users\" ADD \"age\" INTEGER NOT NULL"
//! );
//! ```

pub mod action;
pub mod clauses;
pub mod dialect;
pub mod error;
pub mod logic;
pub mod name;
pub mod registry;
pub mod validation;

pub use error::{ActionError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::action::{
        Action, ActionKind, AutoIncrementDefinition, ColumnDefinition, DefaultValue,
        ForeignKeyAction, ForeignKeyDefinition, ForeignKeyReference, TypedAction,
        UniqueConstraintDefinition,
    };
    pub use crate::clauses::StringClauses;
    pub use crate::dialect::{
        dialect_for, Dialect, DialectKind, GenericDialect, MssqlDialect, MySqlDialect,
        OracleDialect, PostgresDialect, SqliteDialect,
    };
    pub use crate::error::{ActionError, Result};
    pub use crate::logic::{ActionLogic, ActionResult, Scope, Sql};
    pub use crate::name::ObjectName;
    pub use crate::registry::LogicRegistry;
    pub use crate::validation::{ValidationError, ValidationErrors};
}
