//! Action logic: the dialect-aware strategies that validate actions and turn
//! them into SQL.
//!
//! A logic either produces SQL directly ([`ActionResult::Sql`]) or delegates
//! to further actions ([`ActionResult::Delegate`]), which the
//! [`LogicRegistry`](crate::registry::LogicRegistry) resolves in turn.
//! Dialect overrides are separate logic values with a
//! [`required_dialect`](ActionLogic::required_dialect); they replace the
//! generic logic for that dialect entirely.

mod add_columns;
mod add_foreign_key;
mod add_primary_key;
mod add_unique_constraint;
mod alter_table;
mod drop_default_value;
mod execute_sql;
pub mod mssql;
mod rename_table;

use std::fmt;

pub use add_columns::{parse_references, AddColumnsLogic};
pub use add_foreign_key::AddForeignKeyConstraintLogic;
pub use add_primary_key::AddPrimaryKeyLogic;
pub use add_unique_constraint::AddUniqueConstraintLogic;
pub use alter_table::AlterTableLogic;
pub use drop_default_value::DropDefaultValueLogic;
pub use execute_sql::ExecuteSqlLogic;
pub use rename_table::RenameTableLogic;

use crate::action::{Action, ActionKind, TypedAction};
use crate::dialect::{Dialect, DialectKind};
use crate::error::{ActionError, Result};
use crate::validation::ValidationErrors;

/// Keys of replaceable clauses shared by the built-in logic.
pub mod clause {
    /// The `ADD <column> <type>` head of a column definition.
    pub const COLUMN: &str = "column";
    /// `DEFAULT <value>`.
    pub const DEFAULT_VALUE: &str = "default_value";
    /// Auto-increment clause.
    pub const AUTO_INCREMENT: &str = "auto_increment";
    /// `NULL` / `NOT NULL`.
    pub const NULLABLE: &str = "nullable";
    /// `PRIMARY KEY` on a column.
    pub const PRIMARY_KEY: &str = "primary_key";
    /// `AFTER <column>`.
    pub const POSITION: &str = "position";
    /// Escaped constraint name.
    pub const CONSTRAINT_NAME: &str = "constraint_name";
    /// Parenthesized column list.
    pub const COLUMN_NAMES: &str = "column_names";
    /// `CLUSTERED`.
    pub const CLUSTERED: &str = "clustered";
    /// `REFERENCES <table> (<columns>)`.
    pub const REFERENCES: &str = "references";
    /// `USING INDEX TABLESPACE <name>`.
    pub const TABLESPACE: &str = "tablespace";
}

/// Rendered SQL ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sql(String);

impl Sql {
    /// Wraps SQL text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the owned SQL text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Sql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of executing one action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// Final SQL.
    Sql(Sql),
    /// Further actions, resolved and executed in order.
    Delegate(Vec<Action>),
}

impl ActionResult {
    /// Final SQL result.
    #[must_use]
    pub fn sql(text: impl Into<String>) -> Self {
        Self::Sql(Sql::new(text))
    }

    /// Delegation to a single action.
    #[must_use]
    pub fn delegate(action: impl Into<Action>) -> Self {
        Self::Delegate(vec![action.into()])
    }
}

/// Context handed to logic while validating and executing.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> Scope<'a> {
    /// Creates a scope targeting `dialect`.
    #[must_use]
    pub const fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

/// Strategy for one action kind, optionally specialized for one dialect.
///
/// `validate` must report no errors before `execute` is called; the registry
/// enforces this.
pub trait ActionLogic: Send + Sync {
    /// The action struct this logic handles.
    type Action: TypedAction;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Dialect this logic is restricted to; `None` for generic logic.
    fn required_dialect(&self) -> Option<DialectKind> {
        None
    }

    /// Whether this logic applies to `dialect`.
    fn supports_dialect(&self, dialect: &dyn Dialect) -> bool {
        self.required_dialect()
            .is_none_or(|required| required == dialect.kind())
    }

    /// Checks required fields and dialect capabilities.
    fn validate(&self, action: &Self::Action, scope: &Scope<'_>) -> ValidationErrors;

    /// Generates SQL or delegates to further actions. Never mutates `action`.
    fn execute(&self, action: &Self::Action, scope: &Scope<'_>) -> Result<ActionResult>;
}

/// Object-safe view of an [`ActionLogic`] over the [`Action`] enum.
pub trait AnyActionLogic: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// The action kind handled.
    fn supported_action(&self) -> ActionKind;

    /// Dialect this logic is restricted to.
    fn required_dialect(&self) -> Option<DialectKind>;

    /// Whether this logic applies to `dialect`.
    fn supports_dialect(&self, dialect: &dyn Dialect) -> bool;

    /// Validates `action`.
    fn validate(&self, action: &Action, scope: &Scope<'_>) -> ValidationErrors;

    /// Executes `action`.
    fn execute(&self, action: &Action, scope: &Scope<'_>) -> Result<ActionResult>;
}

impl<L: ActionLogic> AnyActionLogic for L {
    fn name(&self) -> &'static str {
        ActionLogic::name(self)
    }

    fn supported_action(&self) -> ActionKind {
        L::Action::KIND
    }

    fn required_dialect(&self) -> Option<DialectKind> {
        ActionLogic::required_dialect(self)
    }

    fn supports_dialect(&self, dialect: &dyn Dialect) -> bool {
        ActionLogic::supports_dialect(self, dialect)
    }

    fn validate(&self, action: &Action, scope: &Scope<'_>) -> ValidationErrors {
        match L::Action::from_action(action) {
            Some(typed) => ActionLogic::validate(self, typed, scope),
            None => {
                let mut errors = ValidationErrors::new();
                errors.add_error(format!(
                    "{} cannot handle {} actions",
                    ActionLogic::name(self),
                    action.kind()
                ));
                errors
            }
        }
    }

    fn execute(&self, action: &Action, scope: &Scope<'_>) -> Result<ActionResult> {
        let typed = L::Action::from_action(action).ok_or_else(|| {
            ActionError::execution(
                action.kind(),
                format!("{} cannot handle this action", ActionLogic::name(self)),
            )
        })?;
        ActionLogic::execute(self, typed, scope)
    }
}
