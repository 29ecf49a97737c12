//! SQLite dialect.
//!
//! SQLite has dynamic typing with a handful of storage classes, so most type
//! descriptions collapse onto INTEGER, REAL, TEXT, NUMERIC, or BLOB.

use super::{DataTypeDescription, Dialect, DialectKind};

/// SQLite dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn render_data_type(&self, data_type: &DataTypeDescription, _auto_increment: bool) -> String {
        match data_type.name.as_str() {
            "int" | "integer" | "int4" | "bigint" | "int8" | "long" | "smallint" | "int2"
            | "short" | "bool" | "boolean" => "INTEGER".to_string(),
            "varchar" | "string" | "char" | "text" | "clob" | "date" | "time" | "datetime"
            | "timestamp" | "uuid" | "json" => "TEXT".to_string(),
            "float" | "real" | "double" => "REAL".to_string(),
            "decimal" | "numeric" => "NUMERIC".to_string(),
            "blob" | "binary" => "BLOB".to_string(),
            _ => data_type.to_standard_sql(),
        }
    }

    fn auto_increment_clause(&self, _start_with: Option<i64>, _increment_by: Option<i64>) -> String {
        "AUTOINCREMENT".to_string()
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn supports_auto_increment(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DefaultValue;

    #[test]
    fn test_sqlite_types() {
        let dialect = SqliteDialect::new();
        assert_eq!(dialect.data_type("bigint", true), "INTEGER");
        assert_eq!(dialect.data_type("varchar(255)", false), "TEXT");
        assert_eq!(dialect.data_type("boolean", false), "INTEGER");
        assert_eq!(dialect.data_type("decimal(10,2)", false), "NUMERIC");
    }

    #[test]
    fn test_sqlite_capabilities() {
        let dialect = SqliteDialect::new();
        assert!(dialect.supports_auto_increment());
        assert!(!dialect.supports_tablespaces());
        assert!(!dialect.supports_clustered_primary_key());
        assert_eq!(dialect.auto_increment_clause(Some(10), None), "AUTOINCREMENT");
        assert_eq!(dialect.default_value_sql(&DefaultValue::Boolean(false)), "0");
    }
}
