//! `ExecuteSql`.

use super::{ActionLogic, ActionResult, Scope};
use crate::action::ExecuteSqlAction;
use crate::error::Result;
use crate::validation::ValidationErrors;

/// Passes raw SQL through unchanged, minus a trailing `;`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteSqlLogic;

impl ExecuteSqlLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ActionLogic for ExecuteSqlLogic {
    type Action = ExecuteSqlAction;

    fn name(&self) -> &'static str {
        "ExecuteSqlLogic"
    }

    fn validate(&self, action: &ExecuteSqlAction, _scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check_required("sql", &action.sql);
        errors
    }

    fn execute(&self, action: &ExecuteSqlAction, _scope: &Scope<'_>) -> Result<ActionResult> {
        let sql = action.sql.trim();
        Ok(ActionResult::sql(sql.strip_suffix(';').unwrap_or(sql).trim_end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::GenericDialect;

    #[test]
    fn test_strips_terminator() {
        let dialect = GenericDialect::new();
        let action = ExecuteSqlAction {
            sql: "  UPDATE users SET active = 1 ;\n".into(),
        };
        assert_eq!(
            ExecuteSqlLogic.execute(&action, &Scope::new(&dialect)).unwrap(),
            ActionResult::sql("UPDATE users SET active = 1")
        );
    }

    #[test]
    fn test_blank_sql_rejected() {
        let dialect = GenericDialect::new();
        let action = ExecuteSqlAction { sql: " ".into() };
        assert!(
            ExecuteSqlLogic
                .validate(&action, &Scope::new(&dialect))
                .is_missing("sql")
        );
    }
}
