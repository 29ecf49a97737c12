//! Integration tests for logic resolution and SQL generation.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{execute, execute_err, validation_errors, MarkerDialect};
use oxide_action::action::{AddColumnsAction, ExecuteSqlAction};
use oxide_action::logic::{clause, AddColumnsLogic};
use oxide_action::prelude::*;

// =============================================================================
// Clause generation
// =============================================================================

#[test]
fn test_add_column_on_explicit_null_dialect() {
    let dialect = MarkerDialect;
    let column = ColumnDefinition::new("age", "integer");

    let clauses = AddColumnsLogic::column_clauses(&column, &Scope::new(&dialect));
    assert_eq!(clauses.render(), "ADD <escaped:age> <rendered:integer> NOT NULL");
    assert!(!clauses.contains_key(clause::DEFAULT_VALUE));
    assert!(!clauses.contains_key(clause::AUTO_INCREMENT));
    assert!(!clauses.contains_key(clause::PRIMARY_KEY));

    let registry = LogicRegistry::default();
    let action = Action::add_columns("users", vec![column]);
    assert_eq!(
        execute(&registry, &dialect, &action),
        vec!["ALTER TABLE <escaped:users> ADD <escaped:age> <rendered:integer> NOT NULL"]
    );
}

#[test]
fn test_nullable_column_gets_explicit_null() {
    let registry = LogicRegistry::default();
    let action = Action::add_columns(
        "users",
        vec![
            ColumnDefinition::new("nickname", "varchar(40)").nullable(),
            ColumnDefinition::new("id", "bigint").nullable().primary_key(),
        ],
    );

    assert_eq!(
        execute(&registry, &MarkerDialect, &action),
        vec![
            "ALTER TABLE <escaped:users> ADD <escaped:nickname> <rendered:varchar(40)> NULL",
            "ALTER TABLE <escaped:users> ADD <escaped:id> <rendered:bigint> NOT NULL PRIMARY KEY",
        ]
    );
}

#[test]
fn test_clustered_primary_key_unsupported() {
    let registry = LogicRegistry::default();
    let dialect = SqliteDialect::new();
    let Action::AddPrimaryKey(mut pk) = Action::add_primary_key("users", "pk_users", ["id"]) else {
        unreachable!()
    };
    pk.clustered = true;
    let action = Action::AddPrimaryKey(pk);

    let errors = registry.validate(&action, &Scope::new(&dialect)).unwrap();
    assert_eq!(
        errors.errors(),
        &[ValidationError::UnsupportedOperation {
            operation: "clustered primary key".into(),
            dialect: "sqlite".into(),
        }]
    );

    let err = execute_err(&registry, &dialect, &action);
    assert_eq!(validation_errors(&err), &errors);
}

#[test]
fn test_foreign_key_reference_parsed() {
    let dialect = GenericDialect::new();
    let action = AddColumnsAction {
        table_name: "child".into(),
        column_definitions: vec![ColumnDefinition::new("parent_id", "integer")],
        unique_constraint_definitions: Vec::new(),
        foreign_key_definitions: vec![ForeignKeyDefinition::references(
            ["parent_id"],
            "parent(id)",
        )],
    };

    let ActionResult::Delegate(actions) = AddColumnsLogic
        .execute(&action, &Scope::new(&dialect))
        .unwrap()
    else {
        panic!("Expected delegation");
    };
    let Some(Action::AddForeignKeyConstraint(fk)) = actions.last() else {
        panic!("Expected a foreign key delegation, got {actions:?}");
    };
    assert_eq!(fk.referenced_table_name, ObjectName::new("parent"));
    assert_eq!(fk.referenced_column_names, vec!["id"]);
    assert_eq!(fk.base_column_names, vec!["parent_id"]);

    let registry = LogicRegistry::default();
    assert_eq!(
        execute(&registry, &dialect, &Action::AddColumns(action)),
        vec![
            "ALTER TABLE \"child\" ADD \"parent_id\" INTEGER NOT NULL",
            "ALTER TABLE \"child\" ADD FOREIGN KEY (\"parent_id\") REFERENCES \"parent\" (\"id\")",
        ]
    );
}

#[test]
fn test_malformed_foreign_key_reference() {
    let registry = LogicRegistry::default();
    let dialect = GenericDialect::new();
    let action = Action::AddColumns(AddColumnsAction {
        table_name: "child".into(),
        column_definitions: vec![ColumnDefinition::new("parent_id", "integer")],
        unique_constraint_definitions: Vec::new(),
        foreign_key_definitions: vec![ForeignKeyDefinition::references(["parent_id"], "parent")],
    });

    let err = execute_err(&registry, &dialect, &action);
    assert!(
        matches!(err, ActionError::Execution { action: ActionKind::AddColumns, .. }),
        "unexpected error: {err:?}"
    );
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_specialized_logic_preferred() {
    let registry = LogicRegistry::default();
    for kind in DialectKind::ALL {
        let dialect = dialect_for(kind);
        let scope = Scope::new(&*dialect);
        let logic = registry.resolve(ActionKind::DropDefaultValue, &scope).unwrap();

        let expected = if kind == DialectKind::Mssql {
            "DropDefaultValueMssqlLogic"
        } else {
            "DropDefaultValueLogic"
        };
        assert_eq!(logic.name(), expected, "dialect {kind}");
    }
}

/// Adds a conflict resolution clause to NOT NULL columns on SQLite.
struct ConflictClauseAddColumns;

impl ActionLogic for ConflictClauseAddColumns {
    type Action = AddColumnsAction;

    fn name(&self) -> &'static str {
        "ConflictClauseAddColumns"
    }

    fn required_dialect(&self) -> Option<DialectKind> {
        Some(DialectKind::Sqlite)
    }

    fn validate(&self, action: &AddColumnsAction, scope: &Scope<'_>) -> ValidationErrors {
        AddColumnsLogic.validate(action, scope)
    }

    fn execute(&self, action: &AddColumnsAction, scope: &Scope<'_>) -> Result<ActionResult> {
        let actions = action
            .column_definitions
            .iter()
            .map(|column| {
                let mut clauses = AddColumnsLogic::column_clauses(column, scope);
                if !column.is_effectively_nullable() {
                    clauses.append_keyed(clause::NULLABLE, "NOT NULL ON CONFLICT ABORT");
                }
                Action::alter_table(action.table_name.clone(), clauses)
            })
            .collect();
        Ok(ActionResult::Delegate(actions))
    }
}

#[test]
fn test_override_replaces_single_clause() {
    let mut registry = LogicRegistry::default();
    registry.register(ConflictClauseAddColumns).unwrap();

    let action = Action::add_columns(
        "users",
        vec![ColumnDefinition::new("code", "varchar(40)").after("name")],
    );

    assert_eq!(
        execute(&registry, &SqliteDialect::new(), &action),
        vec!["ALTER TABLE \"users\" ADD \"code\" TEXT NOT NULL ON CONFLICT ABORT AFTER \"name\""]
    );
    assert_eq!(
        execute(&registry, &PostgresDialect::new(), &action),
        vec!["ALTER TABLE \"users\" ADD \"code\" VARCHAR(40) NOT NULL AFTER \"name\""]
    );
}

/// Claims Oracle but also answers for PostgreSQL.
struct GreedyRename;

impl ActionLogic for GreedyRename {
    type Action = oxide_action::action::RenameTableAction;

    fn name(&self) -> &'static str {
        "GreedyRename"
    }

    fn required_dialect(&self) -> Option<DialectKind> {
        Some(DialectKind::Oracle)
    }

    fn supports_dialect(&self, dialect: &dyn Dialect) -> bool {
        matches!(dialect.kind(), DialectKind::Oracle | DialectKind::Postgres)
    }

    fn validate(&self, _action: &Self::Action, _scope: &Scope<'_>) -> ValidationErrors {
        ValidationErrors::new()
    }

    fn execute(&self, _action: &Self::Action, _scope: &Scope<'_>) -> Result<ActionResult> {
        Ok(ActionResult::sql("SELECT 1"))
    }
}

/// Plain PostgreSQL rename.
struct PostgresRename;

impl ActionLogic for PostgresRename {
    type Action = oxide_action::action::RenameTableAction;

    fn name(&self) -> &'static str {
        "PostgresRename"
    }

    fn required_dialect(&self) -> Option<DialectKind> {
        Some(DialectKind::Postgres)
    }

    fn validate(&self, _action: &Self::Action, _scope: &Scope<'_>) -> ValidationErrors {
        ValidationErrors::new()
    }

    fn execute(&self, _action: &Self::Action, _scope: &Scope<'_>) -> Result<ActionResult> {
        Ok(ActionResult::sql("SELECT 2"))
    }
}

#[test]
fn test_ambiguous_specializations_conflict() {
    let mut registry = LogicRegistry::default();
    registry.register(GreedyRename).unwrap();
    registry.register(PostgresRename).unwrap();

    let action = Action::rename_table("people", "person");
    let err = execute_err(&registry, &PostgresDialect::new(), &action);
    assert!(err.is_resolution_conflict());
    assert!(err.to_string().contains("GreedyRename"));

    assert_eq!(
        execute(&registry, &OracleDialect::new(), &action),
        vec!["SELECT 1"]
    );
}

#[test]
fn test_duplicate_registration_conflict() {
    let mut registry = LogicRegistry::default();
    registry.register(PostgresRename).unwrap();
    assert!(
        registry
            .register(PostgresRename)
            .unwrap_err()
            .is_resolution_conflict()
    );
}

// =============================================================================
// Validation gating and delegation depth
// =============================================================================

static EXECUTIONS: AtomicUsize = AtomicUsize::new(0);

/// Counts how often execution is reached.
struct CountingSql;

impl ActionLogic for CountingSql {
    type Action = ExecuteSqlAction;

    fn name(&self) -> &'static str {
        "CountingSql"
    }

    fn validate(&self, action: &ExecuteSqlAction, _scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check_required("sql", &action.sql);
        errors
    }

    fn execute(&self, action: &ExecuteSqlAction, _scope: &Scope<'_>) -> Result<ActionResult> {
        EXECUTIONS.fetch_add(1, Ordering::SeqCst);
        Ok(ActionResult::sql(action.sql.clone()))
    }
}

#[test]
fn test_validation_gates_execution() {
    let mut registry = LogicRegistry::default();
    registry.replace(CountingSql);
    let dialect = GenericDialect::new();

    let err = execute_err(&registry, &dialect, &Action::execute_sql("  "));
    assert!(validation_errors(&err).is_missing("sql"));
    assert_eq!(EXECUTIONS.load(Ordering::SeqCst), 0);

    assert_eq!(
        execute(&registry, &dialect, &Action::execute_sql("SELECT 1")),
        vec!["SELECT 1"]
    );
    assert_eq!(EXECUTIONS.load(Ordering::SeqCst), 1);
}

/// Delegates to itself forever.
struct Recursive;

impl ActionLogic for Recursive {
    type Action = ExecuteSqlAction;

    fn name(&self) -> &'static str {
        "Recursive"
    }

    fn validate(&self, _action: &ExecuteSqlAction, _scope: &Scope<'_>) -> ValidationErrors {
        ValidationErrors::new()
    }

    fn execute(&self, action: &ExecuteSqlAction, _scope: &Scope<'_>) -> Result<ActionResult> {
        Ok(ActionResult::delegate(Action::execute_sql(action.sql.clone())))
    }
}

#[test]
fn test_delegation_depth_bounded() {
    let mut registry = LogicRegistry::default().with_max_depth(4);
    registry.replace(Recursive);

    let err = execute_err(&registry, &GenericDialect::new(), &Action::execute_sql("loop"));
    assert!(
        matches!(err, ActionError::DelegationDepthExceeded { depth: 4, .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_render_action_from_json() {
    let action: Action = serde_json::from_str(
        r#"{
            "kind": "AddColumns",
            "table_name": "public.users",
            "column_definitions": [
                {"column_name": "id", "column_type": "integer", "primary_key": true,
                 "auto_increment": {}},
                {"column_name": "email", "column_type": "varchar(255)", "nullable": true}
            ],
            "unique_constraint_definitions": [
                {"constraint_name": "uq_users_email", "column_names": ["email"]}
            ]
        }"#,
    )
    .unwrap();

    let registry = LogicRegistry::default();
    assert_eq!(
        execute(&registry, &MySqlDialect::new(), &action),
        vec![
            "ALTER TABLE `public`.`users` ADD `id` INT AUTO_INCREMENT NOT NULL PRIMARY KEY",
            "ALTER TABLE `public`.`users` ADD `email` VARCHAR(255)",
            "ALTER TABLE `public`.`users` ADD CONSTRAINT `uq_users_email` UNIQUE (`email`)",
        ]
    );
}
