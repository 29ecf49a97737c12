//! `AlterTable`: the leaf most other logic delegates to.

use super::{ActionLogic, ActionResult, Scope};
use crate::action::AlterTableAction;
use crate::error::Result;
use crate::validation::ValidationErrors;

/// Renders `ALTER TABLE <table> <clauses>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlterTableLogic;

impl AlterTableLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActionLogic for AlterTableLogic {
    type Action = AlterTableAction;

    fn name(&self) -> &'static str {
        "AlterTableLogic"
    }

    fn validate(&self, action: &AlterTableAction, _scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors
            .check_required("table_name", &action.table_name)
            .check_required("clauses", &action.clauses);
        errors
    }

    fn execute(&self, action: &AlterTableAction, scope: &Scope<'_>) -> Result<ActionResult> {
        Ok(ActionResult::sql(format!(
            "ALTER TABLE {} {}",
            scope.dialect().escape_object_name(&action.table_name),
            action.clauses.render()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::clauses::StringClauses;
    use crate::dialect::MySqlDialect;

    #[test]
    fn test_render() {
        let dialect = MySqlDialect::new();
        let scope = Scope::new(&dialect);
        let Action::AlterTable(action) = Action::alter_table(
            "shop.orders",
            ["ADD `note` LONGTEXT", "", "NULL"].into_iter().collect(),
        ) else {
            unreachable!()
        };

        assert_eq!(
            AlterTableLogic.execute(&action, &scope).unwrap(),
            ActionResult::sql("ALTER TABLE `shop`.`orders` ADD `note` LONGTEXT NULL")
        );
    }

    #[test]
    fn test_blank_clauses_rejected() {
        let dialect = MySqlDialect::new();
        let Action::AlterTable(action) = Action::alter_table("orders", StringClauses::new()) else {
            unreachable!()
        };

        let errors = AlterTableLogic.validate(&action, &Scope::new(&dialect));
        assert!(errors.is_missing("clauses"));
    }
}
