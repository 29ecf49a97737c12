//! `DropDefaultValue`.

use super::{ActionLogic, ActionResult, Scope};
use crate::action::{Action, AlterTableAction, DropDefaultValueAction};
use crate::clauses::StringClauses;
use crate::error::Result;
use crate::validation::ValidationErrors;

/// Generic logic: `ALTER TABLE <table> ALTER COLUMN <column> DROP DEFAULT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropDefaultValueLogic;

impl DropDefaultValueLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActionLogic for DropDefaultValueLogic {
    type Action = DropDefaultValueAction;

    fn name(&self) -> &'static str {
        "DropDefaultValueLogic"
    }

    fn validate(&self, action: &DropDefaultValueAction, _scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors
            .check_required("table_name", &action.table_name)
            .check_required("column_name", &action.column_name);
        errors
    }

    fn execute(&self, action: &DropDefaultValueAction, scope: &Scope<'_>) -> Result<ActionResult> {
        let mut clauses = StringClauses::new();
        clauses
            .append("ALTER COLUMN")
            .append(scope.dialect().escape_column_name(&action.column_name))
            .append("DROP DEFAULT");

        Ok(ActionResult::delegate(Action::AlterTable(AlterTableAction {
            table_name: action.table_name.clone(),
            clauses,
        })))
    }
}
