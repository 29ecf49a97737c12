//! `AddPrimaryKey`.

use super::{clause, ActionLogic, ActionResult, Scope};
use crate::action::{Action, AddPrimaryKeyAction, AlterTableAction};
use crate::clauses::StringClauses;
use crate::error::Result;
use crate::validation::ValidationErrors;

/// Generic logic for [`AddPrimaryKeyAction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AddPrimaryKeyLogic;

impl AddPrimaryKeyLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the keyed clauses following `ALTER TABLE <table>`.
    #[must_use]
    pub fn clauses(action: &AddPrimaryKeyAction, scope: &Scope<'_>) -> StringClauses {
        let dialect = scope.dialect();

        let mut clauses = StringClauses::new();
        clauses.append("ADD");
        if let Some(name) = action.constraint_name.as_deref().filter(|n| !n.trim().is_empty()) {
            clauses.append_keyed(
                clause::CONSTRAINT_NAME,
                format!("CONSTRAINT {}", dialect.escape_constraint_name(name)),
            );
        }
        clauses.append("PRIMARY KEY");
        if action.clustered && dialect.supports_clustered_primary_key() {
            clauses.append_keyed(clause::CLUSTERED, "CLUSTERED");
        }
        clauses.append_keyed(
            clause::COLUMN_NAMES,
            format!("({})", dialect.escape_column_name_list(&action.column_names)),
        );

        if let Some(tablespace) = &action.tablespace {
            if dialect.supports_tablespaces() {
                clauses.append_keyed(
                    clause::TABLESPACE,
                    format!("USING INDEX TABLESPACE {}", dialect.quote_identifier(tablespace)),
                );
            }
        }

        clauses
    }
}

impl ActionLogic for AddPrimaryKeyLogic {
    type Action = AddPrimaryKeyAction;

    fn name(&self) -> &'static str {
        "AddPrimaryKeyLogic"
    }

    fn validate(&self, action: &AddPrimaryKeyAction, scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors
            .check_required("table_name", &action.table_name)
            .check_required("column_names", &action.column_names);

        if action.clustered && !scope.dialect().supports_clustered_primary_key() {
            errors.add_unsupported("clustered primary key", scope.dialect().name());
        }
        errors
    }

    fn execute(&self, action: &AddPrimaryKeyAction, scope: &Scope<'_>) -> Result<ActionResult> {
        Ok(ActionResult::delegate(Action::AlterTable(AlterTableAction {
            table_name: action.table_name.clone(),
            clauses: Self::clauses(action, scope),
        })))
    }
}
