//! `RenameTable`.

use super::{ActionLogic, ActionResult, Scope};
use crate::action::{Action, AlterTableAction, RenameTableAction};
use crate::clauses::StringClauses;
use crate::error::Result;
use crate::validation::ValidationErrors;

/// Generic logic: `ALTER TABLE <old> RENAME TO <new>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameTableLogic;

impl RenameTableLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActionLogic for RenameTableLogic {
    type Action = RenameTableAction;

    fn name(&self) -> &'static str {
        "RenameTableLogic"
    }

    fn validate(&self, action: &RenameTableAction, _scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors
            .check_required("old_table_name", &action.old_table_name)
            .check_required("new_table_name", &action.new_table_name);
        errors
    }

    fn execute(&self, action: &RenameTableAction, scope: &Scope<'_>) -> Result<ActionResult> {
        let mut clauses = StringClauses::new();
        clauses.append(format!(
            "RENAME TO {}",
            scope.dialect().quote_identifier(&action.new_table_name)
        ));

        Ok(ActionResult::delegate(Action::AlterTable(AlterTableAction {
            table_name: action.old_table_name.clone(),
            clauses,
        })))
    }
}
