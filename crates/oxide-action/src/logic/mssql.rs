//! SQL Server overrides.
//!
//! Both replace the generic algorithm entirely: SQL Server names default
//! constraints itself and renames tables through a stored procedure, so
//! neither fits the `ALTER TABLE` clause shape.

use super::{ActionLogic, ActionResult, DropDefaultValueLogic, RenameTableLogic, Scope};
use crate::action::{Action, DropDefaultValueAction, RenameTableAction};
use crate::dialect::DialectKind;
use crate::error::Result;
use crate::validation::ValidationErrors;

fn string_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Drops a default by looking up the system-generated constraint name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropDefaultValueMssqlLogic;

impl DropDefaultValueMssqlLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActionLogic for DropDefaultValueMssqlLogic {
    type Action = DropDefaultValueAction;

    fn name(&self) -> &'static str {
        "DropDefaultValueMssqlLogic"
    }

    fn required_dialect(&self) -> Option<DialectKind> {
        Some(DialectKind::Mssql)
    }

    fn validate(&self, action: &DropDefaultValueAction, scope: &Scope<'_>) -> ValidationErrors {
        DropDefaultValueLogic.validate(action, scope)
    }

    fn execute(&self, action: &DropDefaultValueAction, scope: &Scope<'_>) -> Result<ActionResult> {
        let table = string_literal(&scope.dialect().escape_object_name(&action.table_name));
        let column = string_literal(&action.column_name);

        Ok(ActionResult::delegate(Action::execute_sql(format!(
            "DECLARE @default sysname\n\
             SELECT @default = object_name(default_object_id) FROM sys.columns \
             WHERE object_id=object_id('{table}') AND name='{column}'\n\
             EXEC ('ALTER TABLE {table} DROP CONSTRAINT ' + @default)"
        ))))
    }
}

/// Renames a table with `sp_rename`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameTableMssqlLogic;

impl RenameTableMssqlLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActionLogic for RenameTableMssqlLogic {
    type Action = RenameTableAction;

    fn name(&self) -> &'static str {
        "RenameTableMssqlLogic"
    }

    fn required_dialect(&self) -> Option<DialectKind> {
        Some(DialectKind::Mssql)
    }

    fn validate(&self, action: &RenameTableAction, scope: &Scope<'_>) -> ValidationErrors {
        RenameTableLogic.validate(action, scope)
    }

    fn execute(&self, action: &RenameTableAction, scope: &Scope<'_>) -> Result<ActionResult> {
        let old = string_literal(&scope.dialect().escape_object_name(&action.old_table_name));
        let new = string_literal(&action.new_table_name);

        Ok(ActionResult::delegate(Action::execute_sql(format!(
            "exec sp_rename '{old}', '{new}'"
        ))))
    }
}
