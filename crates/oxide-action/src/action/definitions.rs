//! Nested definitions carried by actions.

use serde::{Deserialize, Serialize};

use crate::name::ObjectName;

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default, rendered per dialect.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default, quoted and escaped.
    String(String),
    /// SQL expression (e.g., `CURRENT_TIMESTAMP`), emitted verbatim.
    Computed(String),
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict.
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub const fn to_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Auto-increment settings of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrementDefinition {
    /// First generated value.
    #[serde(default)]
    pub start_with: Option<i64>,
    /// Step between generated values.
    #[serde(default)]
    pub increment_by: Option<i64>,
}

impl AutoIncrementDefinition {
    /// Auto-increment with dialect defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_with: None,
            increment_by: None,
        }
    }

    /// Auto-increment starting at `start` with step `by`.
    #[must_use]
    pub const fn with(start: i64, by: i64) -> Self {
        Self {
            start_with: Some(start),
            increment_by: Some(by),
        }
    }
}

/// Definition of a column to add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub column_name: String,
    /// Abstract type description, e.g. `integer` or `varchar(255)`.
    pub column_type: String,
    /// Whether NULL is allowed. Primary key columns are never nullable.
    #[serde(default)]
    pub nullable: bool,
    /// Whether the column is the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Default value.
    #[serde(default)]
    pub default_value: Option<DefaultValue>,
    /// Auto-increment settings.
    #[serde(default)]
    pub auto_increment: Option<AutoIncrementDefinition>,
    /// Column after which the new column is positioned.
    #[serde(default)]
    pub add_after_column: Option<String>,
}

impl ColumnDefinition {
    /// Creates a NOT NULL column without default.
    #[must_use]
    pub fn new(column_name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            column_type: column_type.into(),
            nullable: false,
            primary_key: false,
            default_value: None,
            auto_increment: None,
            add_after_column: None,
        }
    }

    /// Allows NULL values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Marks the column as primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Makes the column auto-increment.
    #[must_use]
    pub const fn auto_increment(mut self, definition: AutoIncrementDefinition) -> Self {
        self.auto_increment = Some(definition);
        self
    }

    /// Positions the column after `column`.
    #[must_use]
    pub fn after(mut self, column: impl Into<String>) -> Self {
        self.add_after_column = Some(column.into());
        self
    }

    /// Whether the column is emitted as nullable.
    #[must_use]
    pub const fn is_effectively_nullable(&self) -> bool {
        self.nullable && !self.primary_key
    }
}

/// Unique constraint declared alongside new columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraintDefinition {
    /// Constraint name.
    #[serde(default)]
    pub constraint_name: Option<String>,
    /// Columns covered by the constraint.
    pub column_names: Vec<String>,
}

impl UniqueConstraintDefinition {
    /// Creates an unnamed unique constraint.
    #[must_use]
    pub fn new<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            constraint_name: None,
            column_names: column_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Names the constraint.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.constraint_name = Some(name.into());
        self
    }
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyReference {
    /// Combined `table(column[, column...])` form, parsed at generation time.
    References(String),
    /// Explicit referenced table and columns.
    Explicit {
        /// Referenced table.
        table_name: ObjectName,
        /// Referenced columns.
        column_names: Vec<String>,
    },
}

/// Foreign key declared alongside new columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    /// Constraint name.
    #[serde(default)]
    pub foreign_key_name: Option<String>,
    /// Referencing columns of the base table.
    pub column_names: Vec<String>,
    /// Referenced table and columns.
    pub reference: ForeignKeyReference,
}

impl ForeignKeyDefinition {
    /// Foreign key using the combined `table(column)` form.
    #[must_use]
    pub fn references<I, S>(column_names: I, references: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            foreign_key_name: None,
            column_names: column_names.into_iter().map(Into::into).collect(),
            reference: ForeignKeyReference::References(references.into()),
        }
    }

    /// Foreign key with explicit referenced table and columns.
    #[must_use]
    pub fn explicit<I, S>(
        column_names: I,
        table_name: impl Into<ObjectName>,
        referenced_columns: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            foreign_key_name: None,
            column_names: column_names.into_iter().map(Into::into).collect(),
            reference: ForeignKeyReference::Explicit {
                table_name: table_name.into(),
                column_names: referenced_columns.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Names the constraint.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.foreign_key_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_is_never_nullable() {
        let column = ColumnDefinition::new("id", "bigint").nullable().primary_key();
        assert!(column.nullable);
        assert!(!column.is_effectively_nullable());
    }

    #[test]
    fn test_column_defaults_to_not_null() {
        let column = ColumnDefinition::new("age", "integer");
        assert!(!column.is_effectively_nullable());
        assert!(column.default_value.is_none());
        assert!(column.auto_increment.is_none());
    }

    #[test]
    fn test_column_definition_from_json() {
        let column: ColumnDefinition = serde_json::from_str(
            r#"{"column_name": "created_at", "column_type": "timestamp",
                "default_value": {"type": "computed", "value": "CURRENT_TIMESTAMP"}}"#,
        )
        .unwrap();
        assert_eq!(
            column.default_value,
            Some(DefaultValue::Computed("CURRENT_TIMESTAMP".into()))
        );
        assert!(!column.nullable);
    }
}
