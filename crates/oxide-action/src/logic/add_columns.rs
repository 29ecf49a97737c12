//! `AddColumns`: one `ALTER TABLE ... ADD` per column, then the declared
//! unique and foreign key constraints.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{clause, ActionLogic, ActionResult, Scope};
use crate::action::{
    Action, ActionKind, AddColumnsAction, AddForeignKeyConstraintAction,
    AddUniqueConstraintAction, AlterTableAction, ColumnDefinition, ForeignKeyDefinition,
    ForeignKeyReference,
};
use crate::clauses::StringClauses;
use crate::error::{ActionError, Result};
use crate::name::ObjectName;
use crate::validation::ValidationErrors;

/// `table(column[, column...])`, optionally qualified by any number of
/// containers.
static REFERENCES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\w$]+(?:\.[\w$]+)*)\s*\(\s*([\w$]+(?:\s*,\s*[\w$]+)*)\s*\)\s*$")
        .expect("Invalid references pattern regex")
});

/// Splits a combined `table(column[, column...])` reference.
///
/// Returns `None` if `references` does not have that shape.
#[must_use]
pub fn parse_references(references: &str) -> Option<(ObjectName, Vec<String>)> {
    let captures = REFERENCES_PATTERN.captures(references)?;
    let table = ObjectName::parse(&captures[1]);
    let columns = captures[2]
        .split(',')
        .map(|column| column.trim().to_string())
        .collect();
    Some((table, columns))
}

/// Generic logic for [`AddColumnsAction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AddColumnsLogic;

impl AddColumnsLogic {
    /// Creates the logic.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the keyed clauses adding `column`.
    ///
    /// Dialect overrides call this and replace single clauses by key.
    #[must_use]
    pub fn column_clauses(column: &ColumnDefinition, scope: &Scope<'_>) -> StringClauses {
        let dialect = scope.dialect();
        let auto_increment = column.auto_increment.is_some();

        let mut clauses = StringClauses::new();
        clauses.append_keyed(
            clause::COLUMN,
            format!(
                "ADD {} {}",
                dialect.escape_column_name(&column.column_name),
                dialect.data_type(&column.column_type, auto_increment)
            ),
        );

        if let Some(value) = &column.default_value {
            clauses.append_keyed(
                clause::DEFAULT_VALUE,
                format!("DEFAULT {}", dialect.default_value_sql(value)),
            );
        }

        if let Some(definition) = &column.auto_increment {
            if dialect.supports_auto_increment() {
                clauses.append_keyed(
                    clause::AUTO_INCREMENT,
                    dialect.auto_increment_clause(definition.start_with, definition.increment_by),
                );
            }
        }

        if column.is_effectively_nullable() {
            if dialect.requires_explicit_null() {
                clauses.append_keyed(clause::NULLABLE, "NULL");
            }
        } else {
            clauses.append_keyed(clause::NULLABLE, "NOT NULL");
        }

        if column.primary_key {
            clauses.append_keyed(clause::PRIMARY_KEY, "PRIMARY KEY");
        }

        if let Some(after) = &column.add_after_column {
            clauses.append_keyed(
                clause::POSITION,
                format!("AFTER {}", dialect.escape_column_name(after)),
            );
        }

        clauses
    }

    fn foreign_key_action(
        table_name: &ObjectName,
        definition: &ForeignKeyDefinition,
    ) -> Result<AddForeignKeyConstraintAction> {
        let (referenced_table_name, referenced_column_names) = match &definition.reference {
            ForeignKeyReference::Explicit {
                table_name,
                column_names,
            } => (table_name.clone(), column_names.clone()),
            ForeignKeyReference::References(references) => parse_references(references)
                .ok_or_else(|| {
                    ActionError::execution(
                        ActionKind::AddColumns,
                        format!("Cannot parse foreign key references '{references}'"),
                    )
                })?,
        };

        Ok(AddForeignKeyConstraintAction {
            constraint_name: definition.foreign_key_name.clone(),
            base_table_name: table_name.clone(),
            base_column_names: definition.column_names.clone(),
            referenced_table_name,
            referenced_column_names,
            on_delete: None,
            on_update: None,
            deferrable: false,
            initially_deferred: false,
        })
    }
}

impl ActionLogic for AddColumnsLogic {
    type Action = AddColumnsAction;

    fn name(&self) -> &'static str {
        "AddColumnsLogic"
    }

    fn validate(&self, action: &AddColumnsAction, _scope: &Scope<'_>) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors
            .check_required("table_name", &action.table_name)
            .check_required("column_definitions", &action.column_definitions);

        for (i, column) in action.column_definitions.iter().enumerate() {
            errors
                .check_required(
                    &format!("column_definitions[{i}].column_name"),
                    &column.column_name,
                )
                .check_required(
                    &format!("column_definitions[{i}].column_type"),
                    &column.column_type,
                );
        }

        for (i, unique) in action.unique_constraint_definitions.iter().enumerate() {
            errors.check_required(
                &format!("unique_constraint_definitions[{i}].column_names"),
                &unique.column_names,
            );
        }

        for (i, foreign_key) in action.foreign_key_definitions.iter().enumerate() {
            errors.check_required(
                &format!("foreign_key_definitions[{i}].column_names"),
                &foreign_key.column_names,
            );
            match &foreign_key.reference {
                ForeignKeyReference::References(references) => {
                    errors.check_required(
                        &format!("foreign_key_definitions[{i}].references"),
                        references,
                    );
                }
                ForeignKeyReference::Explicit {
                    table_name,
                    column_names,
                } => {
                    errors
                        .check_required(
                            &format!("foreign_key_definitions[{i}].table_name"),
                            table_name,
                        )
                        .check_required(
                            &format!("foreign_key_definitions[{i}].referenced_column_names"),
                            column_names,
                        );
                }
            }
        }

        errors
    }

    fn execute(&self, action: &AddColumnsAction, scope: &Scope<'_>) -> Result<ActionResult> {
        let mut actions = Vec::with_capacity(
            action.column_definitions.len()
                + action.unique_constraint_definitions.len()
                + action.foreign_key_definitions.len(),
        );

        for column in &action.column_definitions {
            actions.push(Action::AlterTable(AlterTableAction {
                table_name: action.table_name.clone(),
                clauses: Self::column_clauses(column, scope),
            }));
        }

        for unique in &action.unique_constraint_definitions {
            actions.push(Action::AddUniqueConstraint(AddUniqueConstraintAction {
                table_name: action.table_name.clone(),
                constraint_name: unique.constraint_name.clone(),
                column_names: unique.column_names.clone(),
                deferrable: false,
                initially_deferred: false,
                disabled: false,
                tablespace: None,
            }));
        }

        for foreign_key in &action.foreign_key_definitions {
            actions.push(Action::AddForeignKeyConstraint(Self::foreign_key_action(
                &action.table_name,
                foreign_key,
            )?));
        }

        debug!(
            table = %action.table_name,
            delegated = actions.len(),
            "Expanded AddColumns"
        );
        Ok(ActionResult::Delegate(actions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{AutoIncrementDefinition, DefaultValue};
    use crate::dialect::{GenericDialect, MySqlDialect, PostgresDialect, SqliteDialect};

    #[test]
    fn test_parse_references() {
        let (table, columns) = parse_references("parent(id)").unwrap();
        assert_eq!(table, ObjectName::new("parent"));
        assert_eq!(columns, vec!["id"]);

        let (table, columns) = parse_references(" app.orders ( id , tenant_id ) ").unwrap();
        assert_eq!(table, ObjectName::qualified("app", "orders"));
        assert_eq!(columns, vec!["id", "tenant_id"]);

        let (table, columns) = parse_references("catalog.app.parent(id)").unwrap();
        assert_eq!(table.segments(), vec!["catalog", "app", "parent"]);
        assert_eq!(columns, vec!["id"]);
    }

    #[test]
    fn test_parse_references_rejects_malformed() {
        assert!(parse_references("parent").is_none());
        assert!(parse_references("parent()").is_none());
        assert!(parse_references("parent(id").is_none());
        assert!(parse_references("(id)").is_none());
    }

    #[test]
    fn test_column_clauses_full() {
        let dialect = MySqlDialect::new();
        let scope = Scope::new(&dialect);
        let column = ColumnDefinition::new("id", "bigint")
            .primary_key()
            .auto_increment(AutoIncrementDefinition::new())
            .after("tenant_id");

        assert_eq!(
            AddColumnsLogic::column_clauses(&column, &scope).render(),
            "ADD `id` BIGINT AUTO_INCREMENT NOT NULL PRIMARY KEY AFTER `tenant_id`"
        );
    }

    #[test]
    fn test_column_clauses_default_and_nullable() {
        let dialect = GenericDialect::new();
        let scope = Scope::new(&dialect);
        let column = ColumnDefinition::new("status", "varchar(20)")
            .nullable()
            .default_value(DefaultValue::String("new".into()));

        let clauses = AddColumnsLogic::column_clauses(&column, &scope);
        assert_eq!(clauses.render(), "ADD \"status\" VARCHAR(20) DEFAULT 'new'");
        assert!(!clauses.contains_key(clause::NULLABLE));
    }

    #[test]
    fn test_auto_increment_skipped_when_unsupported() {
        let dialect = GenericDialect::new();
        let scope = Scope::new(&dialect);
        let column =
            ColumnDefinition::new("id", "integer").auto_increment(AutoIncrementDefinition::new());

        let clauses = AddColumnsLogic::column_clauses(&column, &scope);
        assert_eq!(clauses.render(), "ADD \"id\" INTEGER NOT NULL");
        assert!(!clauses.contains_key(clause::AUTO_INCREMENT));
    }

    #[test]
    fn test_auto_increment_in_type() {
        let dialect = PostgresDialect::new();
        let scope = Scope::new(&dialect);
        let column =
            ColumnDefinition::new("id", "bigint").auto_increment(AutoIncrementDefinition::new());

        assert_eq!(
            AddColumnsLogic::column_clauses(&column, &scope).render(),
            "ADD \"id\" BIGSERIAL NOT NULL"
        );
    }

    #[test]
    fn test_execute_delegates_in_order() {
        let dialect = SqliteDialect::new();
        let scope = Scope::new(&dialect);
        let action = AddColumnsAction {
            table_name: ObjectName::new("child"),
            column_definitions: vec![
                ColumnDefinition::new("parent_id", "integer"),
                ColumnDefinition::new("code", "varchar(8)"),
            ],
            unique_constraint_definitions: vec![
                crate::action::UniqueConstraintDefinition::new(["code"]).named("uq_child_code"),
            ],
            foreign_key_definitions: vec![ForeignKeyDefinition::references(
                ["parent_id"],
                "parent(id)",
            )],
        };

        let ActionResult::Delegate(actions) = AddColumnsLogic.execute(&action, &scope).unwrap()
        else {
            panic!("Expected delegation");
        };
        let kinds: Vec<_> = actions.iter().map(Action::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::AlterTable,
                ActionKind::AlterTable,
                ActionKind::AddUniqueConstraint,
                ActionKind::AddForeignKeyConstraint,
            ]
        );
    }

    #[test]
    fn test_validate_nested_columns() {
        let dialect = GenericDialect::new();
        let scope = Scope::new(&dialect);
        let action = AddColumnsAction {
            table_name: ObjectName::new("users"),
            column_definitions: vec![ColumnDefinition::new("age", "")],
            unique_constraint_definitions: Vec::new(),
            foreign_key_definitions: Vec::new(),
        };

        let errors = AddColumnsLogic.validate(&action, &scope);
        assert_eq!(
            errors.messages(),
            vec!["column_definitions[0].column_type is required"]
        );
    }
}
