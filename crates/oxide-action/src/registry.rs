//! Logic registry and resolver.
//!
//! The registry maps each [`ActionKind`] to the logic able to handle it.
//! Resolution prefers logic specialized for the target dialect over generic
//! logic. Two logic values specialized for the same dialect, or two generic
//! ones for the same kind, are a configuration error.

use std::collections::BTreeMap;

use tracing::debug;

use crate::action::{Action, ActionKind};
use crate::error::{ActionError, Result};
use crate::logic::mssql::{DropDefaultValueMssqlLogic, RenameTableMssqlLogic};
use crate::logic::{
    ActionLogic, ActionResult, AddColumnsLogic, AddForeignKeyConstraintLogic, AddPrimaryKeyLogic,
    AddUniqueConstraintLogic, AlterTableLogic, AnyActionLogic, DropDefaultValueLogic,
    ExecuteSqlLogic, RenameTableLogic, Scope, Sql,
};
use crate::validation::ValidationErrors;

/// Default bound on nested delegation.
pub const MAX_DELEGATION_DEPTH: usize = 32;

/// Registered action logic, indexed by action kind.
pub struct LogicRegistry {
    logic: BTreeMap<ActionKind, Vec<Box<dyn AnyActionLogic>>>,
    max_depth: usize,
}

impl LogicRegistry {
    /// Creates a registry without any logic.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            logic: BTreeMap::new(),
            max_depth: MAX_DELEGATION_DEPTH,
        }
    }

    /// Creates a registry holding the built-in logic, including the dialect
    /// overrides.
    #[must_use]
    pub fn with_default_logic() -> Self {
        let mut registry = Self::empty();
        registry.insert(AddColumnsLogic::new());
        registry.insert(AddPrimaryKeyLogic::new());
        registry.insert(AddUniqueConstraintLogic::new());
        registry.insert(AddForeignKeyConstraintLogic::new());
        registry.insert(DropDefaultValueLogic::new());
        registry.insert(DropDefaultValueMssqlLogic::new());
        registry.insert(RenameTableLogic::new());
        registry.insert(RenameTableMssqlLogic::new());
        registry.insert(AlterTableLogic::new());
        registry.insert(ExecuteSqlLogic::new());
        registry
    }

    /// Sets the delegation depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the delegation depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn insert<L: ActionLogic + 'static>(&mut self, logic: L) {
        self.logic
            .entry(AnyActionLogic::supported_action(&logic))
            .or_default()
            .push(Box::new(logic));
    }

    /// Registers `logic`.
    ///
    /// Fails with [`ActionError::ResolutionConflict`] if logic with the same
    /// action kind and dialect restriction is already registered.
    pub fn register<L: ActionLogic + 'static>(&mut self, logic: L) -> Result<&mut Self> {
        let kind = AnyActionLogic::supported_action(&logic);
        let required = AnyActionLogic::required_dialect(&logic);

        if let Some(existing) = self
            .logic
            .get(&kind)
            .and_then(|registered| registered.iter().find(|l| l.required_dialect() == required))
        {
            return Err(ActionError::ResolutionConflict {
                action: kind,
                dialect: required.map_or_else(|| "any dialect".to_string(), |d| d.to_string()),
                message: format!(
                    "{} is already registered; cannot also register {}",
                    existing.name(),
                    ActionLogic::name(&logic)
                ),
            });
        }

        self.insert(logic);
        Ok(self)
    }

    /// Registers `logic`, replacing logic with the same action kind and
    /// dialect restriction.
    pub fn replace<L: ActionLogic + 'static>(&mut self, logic: L) -> &mut Self {
        let kind = AnyActionLogic::supported_action(&logic);
        let required = AnyActionLogic::required_dialect(&logic);
        if let Some(registered) = self.logic.get_mut(&kind) {
            registered.retain(|l| l.required_dialect() != required);
        }
        self.insert(logic);
        self
    }

    /// Selects the logic for `kind` on the scope's dialect.
    pub fn resolve(&self, kind: ActionKind, scope: &Scope<'_>) -> Result<&dyn AnyActionLogic> {
        let dialect = scope.dialect();
        let conflict = |message: String| ActionError::ResolutionConflict {
            action: kind,
            dialect: dialect.name().to_string(),
            message,
        };

        let candidates: Vec<&dyn AnyActionLogic> = self
            .logic
            .get(&kind)
            .map(|registered| {
                registered
                    .iter()
                    .map(|l| &**l)
                    .filter(|l| l.supports_dialect(dialect))
                    .collect()
            })
            .unwrap_or_default();

        let (specialized, generic): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|l| l.required_dialect().is_some());

        let chosen = match (specialized.as_slice(), generic.as_slice()) {
            ([only], _) | ([], [only]) => *only,
            ([], []) => return Err(conflict("no logic registered".to_string())),
            ([], many) | (many, _) => {
                let names: Vec<_> = many.iter().map(|l| l.name()).collect();
                return Err(conflict(format!(
                    "multiple equally specific logic: {}",
                    names.join(", ")
                )));
            }
        };

        debug!(
            action = %kind,
            dialect = dialect.name(),
            logic = chosen.name(),
            "Resolved action logic"
        );
        Ok(chosen)
    }

    /// Validates `action` with the logic resolved for it.
    pub fn validate(&self, action: &Action, scope: &Scope<'_>) -> Result<ValidationErrors> {
        Ok(self.resolve(action.kind(), scope)?.validate(action, scope))
    }

    /// Validates and executes `action`, expanding delegations depth first.
    ///
    /// Returns the SQL of every leaf in order. Nothing is returned for an
    /// action whose validation, or any nested action's validation, fails.
    pub fn execute(&self, action: &Action, scope: &Scope<'_>) -> Result<Vec<Sql>> {
        let mut statements = Vec::new();
        self.execute_nested(action, scope, 0, &mut statements)?;
        Ok(statements)
    }

    fn execute_nested(
        &self,
        action: &Action,
        scope: &Scope<'_>,
        depth: usize,
        statements: &mut Vec<Sql>,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(ActionError::DelegationDepthExceeded {
                action: action.kind(),
                depth: self.max_depth,
            });
        }

        let logic = self.resolve(action.kind(), scope)?;
        let errors = logic.validate(action, scope);
        if errors.has_errors() {
            return Err(ActionError::Validation {
                action: action.kind(),
                errors,
            });
        }

        match logic.execute(action, scope)? {
            ActionResult::Sql(sql) => {
                debug!(depth, sql = %sql, "Generated SQL");
                statements.push(sql);
            }
            ActionResult::Delegate(actions) => {
                for delegated in &actions {
                    self.execute_nested(delegated, scope, depth + 1, statements)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for LogicRegistry {
    fn default() -> Self {
        Self::with_default_logic()
    }
}

impl std::fmt::Debug for LogicRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, registered) in &self.logic {
            let names: Vec<_> = registered.iter().map(|l| l.name()).collect();
            map.entry(kind, &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ColumnDefinition, RenameTableAction};
    use crate::dialect::{MssqlDialect, SqliteDialect};

    #[test]
    fn test_default_registry_renders_add_columns() {
        let registry = LogicRegistry::default();
        let dialect = SqliteDialect::new();
        let action = Action::add_columns(
            "users",
            vec![
                ColumnDefinition::new("age", "integer"),
                ColumnDefinition::new("nickname", "varchar(40)").nullable(),
            ],
        );

        let statements = registry.execute(&action, &Scope::new(&dialect)).unwrap();
        let sql: Vec<_> = statements.iter().map(Sql::as_str).collect();
        assert_eq!(
            sql,
            vec![
                "ALTER TABLE \"users\" ADD \"age\" INTEGER NOT NULL",
                "ALTER TABLE \"users\" ADD \"nickname\" TEXT",
            ]
        );
    }

    #[test]
    fn test_override_wins_only_on_its_dialect() {
        let registry = LogicRegistry::default();
        let action = Action::rename_table("people", "person");

        let mssql = MssqlDialect::new();
        assert_eq!(
            registry
                .resolve(ActionKind::RenameTable, &Scope::new(&mssql))
                .unwrap()
                .name(),
            "RenameTableMssqlLogic"
        );
        assert_eq!(
            registry.execute(&action, &Scope::new(&mssql)).unwrap(),
            vec![Sql::new("exec sp_rename '[people]', 'person'")]
        );

        let sqlite = SqliteDialect::new();
        assert_eq!(
            registry.execute(&action, &Scope::new(&sqlite)).unwrap(),
            vec![Sql::new("ALTER TABLE \"people\" RENAME TO \"person\"")]
        );
    }

    #[test]
    fn test_register_duplicate_is_conflict() {
        let mut registry = LogicRegistry::default();
        let err = registry.register(RenameTableMssqlLogic::new()).unwrap_err();
        assert!(err.is_resolution_conflict());

        registry.replace(RenameTableMssqlLogic::new());
        let dialect = MssqlDialect::new();
        assert!(
            registry
                .resolve(ActionKind::RenameTable, &Scope::new(&dialect))
                .is_ok()
        );
    }

    #[test]
    fn test_missing_logic_is_conflict() {
        let registry = LogicRegistry::empty();
        let dialect = SqliteDialect::new();
        let err = registry
            .execute(&Action::execute_sql("SELECT 1"), &Scope::new(&dialect))
            .unwrap_err();
        assert!(err.is_resolution_conflict());
    }

    #[test]
    fn test_validation_stops_generation() {
        let registry = LogicRegistry::default();
        let dialect = SqliteDialect::new();
        let action = Action::RenameTable(RenameTableAction {
            old_table_name: "people".into(),
            new_table_name: String::new(),
        });

        let err = registry.execute(&action, &Scope::new(&dialect)).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.is_missing("new_table_name"));
    }
}
