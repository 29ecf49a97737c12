//! `AddForeignKeyConstraint`.

use super::{clause, ActionLogic, ActionResult, Scope};
use crate::action::{Action, AddForeignKeyConstraintAction, AlterTableAction};
use crate::clauses::StringClauses;
use crate::error::Result;
use crate::validation::ValidationErrors;

/// Generic logic for [`AddForeignKeyConstraintAction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AddForeignKeyConstraintLogic;

impl AddForeignKeyConstraintLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the keyed clauses following `ALTER TABLE <base table>`.
    #[must_use]
    pub fn clauses(action: &AddForeignKeyConstraintAction, scope: &Scope<'_>) -> StringClauses {
        let dialect = scope.dialect();

        let mut clauses = StringClauses::new();
        clauses.append("ADD");
        if let Some(name) = action.constraint_name.as_deref().filter(|n| !n.trim().is_empty()) {
            clauses.append_keyed(
                clause::CONSTRAINT_NAME,
                format!("CONSTRAINT {}", dialect.escape_constraint_name(name)),
            );
        }
        clauses.append_keyed(
            clause::COLUMN_NAMES,
            format!(
                "FOREIGN KEY ({})",
                dialect.escape_column_name_list(&action.base_column_names)
            ),
        );
        clauses.append_keyed(
            clause::REFERENCES,
            format!(
                "REFERENCES {} ({})",
                dialect.escape_object_name(&action.referenced_table_name),
                dialect.escape_column_name_list(&action.referenced_column_names)
            ),
        );

        if let Some(on_delete) = action.on_delete {
            clauses.append(format!("ON DELETE {}", on_delete.to_sql()));
        }
        if let Some(on_update) = action.on_update {
            clauses.append(format!("ON UPDATE {}", on_update.to_sql()));
        }

        if dialect.supports_initially_deferrable_columns() {
            if action.deferrable {
                clauses.append("DEFERRABLE");
            }
            if action.initially_deferred {
                clauses.append("INITIALLY DEFERRED");
            }
        }

        clauses
    }
}

impl ActionLogic for AddForeignKeyConstraintLogic {
    type Action = AddForeignKeyConstraintAction;

    fn name(&self) -> &'static str {
        "AddForeignKeyConstraintLogic"
    }

    fn validate(
        &self,
        action: &AddForeignKeyConstraintAction,
        _scope: &Scope<'_>,
    ) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors
            .check_required("base_table_name", &action.base_table_name)
            .check_required("base_column_names", &action.base_column_names)
            .check_required("referenced_table_name", &action.referenced_table_name)
            .check_required("referenced_column_names", &action.referenced_column_names);

        if !action.base_column_names.is_empty()
            && !action.referenced_column_names.is_empty()
            && action.base_column_names.len() != action.referenced_column_names.len()
        {
            errors.add_error(format!(
                "foreign key has {} base columns but {} referenced columns",
                action.base_column_names.len(),
                action.referenced_column_names.len()
            ));
        }
        errors
    }

    fn execute(
        &self,
        action: &AddForeignKeyConstraintAction,
        scope: &Scope<'_>,
    ) -> Result<ActionResult> {
        Ok(ActionResult::delegate(Action::AlterTable(AlterTableAction {
            table_name: action.base_table_name.clone(),
            clauses: Self::clauses(action, scope),
        })))
    }
}
