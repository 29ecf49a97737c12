//! Abstract, dialect-independent descriptions of schema changes.
//!
//! An [`Action`] says *what* should change. Which SQL achieves it on a given
//! database is decided by the [`ActionLogic`](crate::logic::ActionLogic)
//! registered for its [`ActionKind`]. Actions are plain values: they are built
//! by callers, consumed by the resolver, and never mutated by a logic.

mod definitions;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use definitions::{
    AutoIncrementDefinition, ColumnDefinition, DefaultValue, ForeignKeyAction,
    ForeignKeyDefinition, ForeignKeyReference, UniqueConstraintDefinition,
};

use crate::clauses::StringClauses;
use crate::name::ObjectName;

/// Discriminator of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    /// [`AddColumnsAction`].
    AddColumns,
    /// [`AddPrimaryKeyAction`].
    AddPrimaryKey,
    /// [`AddUniqueConstraintAction`].
    AddUniqueConstraint,
    /// [`AddForeignKeyConstraintAction`].
    AddForeignKeyConstraint,
    /// [`DropDefaultValueAction`].
    DropDefaultValue,
    /// [`RenameTableAction`].
    RenameTable,
    /// [`AlterTableAction`].
    AlterTable,
    /// [`ExecuteSqlAction`].
    ExecuteSql,
}

impl ActionKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddColumns => "AddColumns",
            Self::AddPrimaryKey => "AddPrimaryKey",
            Self::AddUniqueConstraint => "AddUniqueConstraint",
            Self::AddForeignKeyConstraint => "AddForeignKeyConstraint",
            Self::DropDefaultValue => "DropDefaultValue",
            Self::RenameTable => "RenameTable",
            Self::AlterTable => "AlterTable",
            Self::ExecuteSql => "ExecuteSql",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Adds one or more columns, with optional unique and foreign key constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddColumnsAction {
    /// Table receiving the columns.
    pub table_name: ObjectName,
    /// Columns to add, in order.
    pub column_definitions: Vec<ColumnDefinition>,
    /// Unique constraints to add after the columns.
    #[serde(default)]
    pub unique_constraint_definitions: Vec<UniqueConstraintDefinition>,
    /// Foreign keys to add after the columns.
    #[serde(default)]
    pub foreign_key_definitions: Vec<ForeignKeyDefinition>,
}

/// Adds a primary key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPrimaryKeyAction {
    /// Table name.
    pub table_name: ObjectName,
    /// Constraint name.
    #[serde(default)]
    pub constraint_name: Option<String>,
    /// Key columns.
    pub column_names: Vec<String>,
    /// Request a clustered key.
    #[serde(default)]
    pub clustered: bool,
    /// Index tablespace.
    #[serde(default)]
    pub tablespace: Option<String>,
}

/// Adds a unique constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddUniqueConstraintAction {
    /// Table name.
    pub table_name: ObjectName,
    /// Constraint name.
    #[serde(default)]
    pub constraint_name: Option<String>,
    /// Constrained columns.
    pub column_names: Vec<String>,
    /// Emit `DEFERRABLE` where supported.
    #[serde(default)]
    pub deferrable: bool,
    /// Emit `INITIALLY DEFERRED` where supported.
    #[serde(default)]
    pub initially_deferred: bool,
    /// Create the constraint disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Index tablespace.
    #[serde(default)]
    pub tablespace: Option<String>,
}

/// Adds a foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddForeignKeyConstraintAction {
    /// Constraint name.
    #[serde(default)]
    pub constraint_name: Option<String>,
    /// Referencing table.
    pub base_table_name: ObjectName,
    /// Referencing columns.
    pub base_column_names: Vec<String>,
    /// Referenced table.
    pub referenced_table_name: ObjectName,
    /// Referenced columns.
    pub referenced_column_names: Vec<String>,
    /// ON DELETE behavior.
    #[serde(default)]
    pub on_delete: Option<ForeignKeyAction>,
    /// ON UPDATE behavior.
    #[serde(default)]
    pub on_update: Option<ForeignKeyAction>,
    /// Emit `DEFERRABLE` where supported.
    #[serde(default)]
    pub deferrable: bool,
    /// Emit `INITIALLY DEFERRED` where supported.
    #[serde(default)]
    pub initially_deferred: bool,
}

/// Drops the default value of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropDefaultValueAction {
    /// Table name.
    pub table_name: ObjectName,
    /// Column name.
    pub column_name: String,
}

/// Renames a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTableAction {
    /// Current table name.
    pub old_table_name: ObjectName,
    /// New unqualified table name.
    pub new_table_name: String,
}

/// `ALTER TABLE` with prebuilt clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterTableAction {
    /// Table name.
    pub table_name: ObjectName,
    /// Clauses following the table name.
    pub clauses: StringClauses,
}

/// Raw SQL, submitted as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSqlAction {
    /// SQL text.
    pub sql: String,
}

/// A schema change to resolve into SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    /// Add columns.
    AddColumns(AddColumnsAction),
    /// Add a primary key.
    AddPrimaryKey(AddPrimaryKeyAction),
    /// Add a unique constraint.
    AddUniqueConstraint(AddUniqueConstraintAction),
    /// Add a foreign key.
    AddForeignKeyConstraint(AddForeignKeyConstraintAction),
    /// Drop a column default.
    DropDefaultValue(DropDefaultValueAction),
    /// Rename a table.
    RenameTable(RenameTableAction),
    /// Alter a table with explicit clauses.
    AlterTable(AlterTableAction),
    /// Execute raw SQL.
    ExecuteSql(ExecuteSqlAction),
}

impl Action {
    /// Returns the kind of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::AddColumns(_) => ActionKind::AddColumns,
            Self::AddPrimaryKey(_) => ActionKind::AddPrimaryKey,
            Self::AddUniqueConstraint(_) => ActionKind::AddUniqueConstraint,
            Self::AddForeignKeyConstraint(_) => ActionKind::AddForeignKeyConstraint,
            Self::DropDefaultValue(_) => ActionKind::DropDefaultValue,
            Self::RenameTable(_) => ActionKind::RenameTable,
            Self::AlterTable(_) => ActionKind::AlterTable,
            Self::ExecuteSql(_) => ActionKind::ExecuteSql,
        }
    }

    /// Adds columns to `table`.
    #[must_use]
    pub fn add_columns(table: impl Into<ObjectName>, columns: Vec<ColumnDefinition>) -> Self {
        Self::AddColumns(AddColumnsAction {
            table_name: table.into(),
            column_definitions: columns,
            unique_constraint_definitions: Vec::new(),
            foreign_key_definitions: Vec::new(),
        })
    }

    /// Adds a primary key over `columns`.
    #[must_use]
    pub fn add_primary_key<I, S>(
        table: impl Into<ObjectName>,
        constraint_name: impl Into<String>,
        columns: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AddPrimaryKey(AddPrimaryKeyAction {
            table_name: table.into(),
            constraint_name: Some(constraint_name.into()),
            column_names: columns.into_iter().map(Into::into).collect(),
            clustered: false,
            tablespace: None,
        })
    }

    /// Adds a unique constraint over `columns`.
    #[must_use]
    pub fn add_unique_constraint<I, S>(
        table: impl Into<ObjectName>,
        constraint_name: Option<String>,
        columns: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AddUniqueConstraint(AddUniqueConstraintAction {
            table_name: table.into(),
            constraint_name,
            column_names: columns.into_iter().map(Into::into).collect(),
            deferrable: false,
            initially_deferred: false,
            disabled: false,
            tablespace: None,
        })
    }

    /// Drops the default of `table.column`.
    #[must_use]
    pub fn drop_default_value(table: impl Into<ObjectName>, column: impl Into<String>) -> Self {
        Self::DropDefaultValue(DropDefaultValueAction {
            table_name: table.into(),
            column_name: column.into(),
        })
    }

    /// Renames `old` to `new`.
    #[must_use]
    pub fn rename_table(old: impl Into<ObjectName>, new: impl Into<String>) -> Self {
        Self::RenameTable(RenameTableAction {
            old_table_name: old.into(),
            new_table_name: new.into(),
        })
    }

    /// `ALTER TABLE table <clauses>`.
    #[must_use]
    pub fn alter_table(table: impl Into<ObjectName>, clauses: StringClauses) -> Self {
        Self::AlterTable(AlterTableAction {
            table_name: table.into(),
            clauses,
        })
    }

    /// Raw SQL.
    #[must_use]
    pub fn execute_sql(sql: impl Into<String>) -> Self {
        Self::ExecuteSql(ExecuteSqlAction { sql: sql.into() })
    }
}

impl From<AddColumnsAction> for Action {
    fn from(action: AddColumnsAction) -> Self {
        Self::AddColumns(action)
    }
}

impl From<AddPrimaryKeyAction> for Action {
    fn from(action: AddPrimaryKeyAction) -> Self {
        Self::AddPrimaryKey(action)
    }
}

impl From<AddUniqueConstraintAction> for Action {
    fn from(action: AddUniqueConstraintAction) -> Self {
        Self::AddUniqueConstraint(action)
    }
}

impl From<AddForeignKeyConstraintAction> for Action {
    fn from(action: AddForeignKeyConstraintAction) -> Self {
        Self::AddForeignKeyConstraint(action)
    }
}

/// An action struct that can be borrowed out of an [`Action`].
pub trait TypedAction: fmt::Debug + Sized {
    /// Kind of the wrapping [`Action`] variant.
    const KIND: ActionKind;

    /// Borrows the struct if `action` is of this kind.
    fn from_action(action: &Action) -> Option<&Self>;
}

macro_rules! typed_action {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl TypedAction for $ty {
                const KIND: ActionKind = ActionKind::$variant;

                fn from_action(action: &Action) -> Option<&Self> {
                    match action {
                        Action::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

typed_action! {
    AddColumns => AddColumnsAction,
    AddPrimaryKey => AddPrimaryKeyAction,
    AddUniqueConstraint => AddUniqueConstraintAction,
    AddForeignKeyConstraint => AddForeignKeyConstraintAction,
    DropDefaultValue => DropDefaultValueAction,
    RenameTable => RenameTableAction,
    AlterTable => AlterTableAction,
    ExecuteSql => ExecuteSqlAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let action = Action::add_columns("users", vec![ColumnDefinition::new("age", "integer")]);
        assert_eq!(action.kind(), ActionKind::AddColumns);
        assert_eq!(action.kind().to_string(), "AddColumns");
        assert_eq!(
            Action::execute_sql("SELECT 1").kind(),
            ActionKind::ExecuteSql
        );
    }

    #[test]
    fn test_typed_action() {
        let action = Action::rename_table("surname", "last_name");
        let rename = RenameTableAction::from_action(&action).unwrap();
        assert_eq!(rename.new_table_name, "last_name");
        assert!(AddColumnsAction::from_action(&action).is_none());
        assert_eq!(RenameTableAction::KIND, action.kind());
    }

    #[test]
    fn test_action_from_json() {
        let action: Action = serde_json::from_str(
            r#"{
                "kind": "AddPrimaryKey",
                "table_name": "public.users",
                "constraint_name": "pk_users",
                "column_names": ["id"],
                "clustered": true
            }"#,
        )
        .unwrap();

        let Action::AddPrimaryKey(pk) = &action else {
            panic!("Expected AddPrimaryKey, got {action:?}");
        };
        assert_eq!(pk.table_name, ObjectName::qualified("public", "users"));
        assert!(pk.clustered);
        assert!(pk.tablespace.is_none());
    }
}
