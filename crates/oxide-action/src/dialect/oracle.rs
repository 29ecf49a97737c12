//! Oracle dialect.

use super::{DataTypeDescription, Dialect, DialectKind};

/// Oracle Database dialect (12c and later identity columns).
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl OracleDialect {
    /// Creates a new Oracle dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn render_data_type(&self, data_type: &DataTypeDescription, _auto_increment: bool) -> String {
        match data_type.name.as_str() {
            "int" | "integer" | "int4" => "NUMBER(10)".to_string(),
            "bigint" | "int8" | "long" => "NUMBER(19)".to_string(),
            "smallint" | "int2" | "short" => "NUMBER(5)".to_string(),
            "bool" | "boolean" => "NUMBER(1)".to_string(),
            "varchar" | "string" => data_type.with_name("VARCHAR2"),
            "decimal" | "numeric" => data_type.with_name("NUMBER"),
            "double" => "FLOAT(53)".to_string(),
            "datetime" => "TIMESTAMP".to_string(),
            "uuid" => "RAW(16)".to_string(),
            _ => data_type.to_standard_sql(),
        }
    }

    fn auto_increment_clause(&self, start_with: Option<i64>, increment_by: Option<i64>) -> String {
        let mut clause = String::from("GENERATED BY DEFAULT AS IDENTITY");
        let options: Vec<String> = [
            start_with.map(|s| format!("START WITH {s}")),
            increment_by.map(|b| format!("INCREMENT BY {b}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !options.is_empty() {
            clause.push_str(&format!(" ({})", options.join(" ")));
        }
        clause
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
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
    fn test_oracle_identity_clause() {
        let dialect = OracleDialect::new();
        assert_eq!(
            dialect.auto_increment_clause(None, None),
            "GENERATED BY DEFAULT AS IDENTITY"
        );
        assert_eq!(
            dialect.auto_increment_clause(Some(5), Some(2)),
            "GENERATED BY DEFAULT AS IDENTITY (START WITH 5 INCREMENT BY 2)"
        );
    }

    #[test]
    fn test_oracle_types() {
        let dialect = OracleDialect::new();
        assert_eq!(dialect.data_type("varchar(30)", false), "VARCHAR2(30)");
        assert_eq!(dialect.data_type("decimal(12, 4)", false), "NUMBER(12, 4)");
        assert_eq!(dialect.data_type("bigint", false), "NUMBER(19)");
    }
}
