//! PostgreSQL dialect.

use super::{DataTypeDescription, Dialect, DialectKind};

/// PostgreSQL dialect.
///
/// Auto-increment is expressed through the `SERIAL` family of types, so the
/// auto-increment clause itself is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn render_data_type(&self, data_type: &DataTypeDescription, auto_increment: bool) -> String {
        match (data_type.name.as_str(), auto_increment) {
            ("int" | "integer" | "int4", true) => "SERIAL".to_string(),
            ("bigint" | "int8" | "long", true) => "BIGSERIAL".to_string(),
            ("smallint" | "int2" | "short", true) => "SMALLSERIAL".to_string(),
            ("text" | "clob", _) => "TEXT".to_string(),
            ("datetime", _) => "TIMESTAMP".to_string(),
            ("blob" | "binary", _) => "BYTEA".to_string(),
            ("uuid", _) => "UUID".to_string(),
            ("json", _) => "JSONB".to_string(),
            _ => data_type.to_standard_sql(),
        }
    }

    fn supports_auto_increment(&self) -> bool {
        true
    }

    fn supports_tablespaces(&self) -> bool {
        true
    }

    fn supports_initially_deferrable_columns(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_serial_types() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.data_type("integer", true), "SERIAL");
        assert_eq!(dialect.data_type("bigint", true), "BIGSERIAL");
        assert_eq!(dialect.data_type("bigint", false), "BIGINT");
        assert_eq!(dialect.auto_increment_clause(Some(1), Some(1)), "");
    }

    #[test]
    fn test_postgres_types() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.data_type("datetime", false), "TIMESTAMP");
        assert_eq!(dialect.data_type("json", false), "JSONB");
        assert_eq!(dialect.data_type("varchar(40)", false), "VARCHAR(40)");
        assert!(dialect.supports_tablespaces());
        assert!(dialect.supports_initially_deferrable_columns());
    }
}
