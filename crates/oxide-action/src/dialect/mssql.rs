//! Microsoft SQL Server dialect.

use super::{DataTypeDescription, Dialect, DialectKind};

/// Microsoft SQL Server dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Mssql
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn render_data_type(&self, data_type: &DataTypeDescription, _auto_increment: bool) -> String {
        match data_type.name.as_str() {
            "int" | "integer" | "int4" => "INT".to_string(),
            "bool" | "boolean" => "BIT".to_string(),
            "varchar" | "string" => data_type.with_name("NVARCHAR"),
            "text" | "clob" => "NVARCHAR(MAX)".to_string(),
            "double" => "FLOAT".to_string(),
            "datetime" | "timestamp" => "DATETIME2".to_string(),
            "blob" | "binary" => "VARBINARY(MAX)".to_string(),
            "uuid" => "UNIQUEIDENTIFIER".to_string(),
            _ => data_type.to_standard_sql(),
        }
    }

    fn auto_increment_clause(&self, start_with: Option<i64>, increment_by: Option<i64>) -> String {
        format!(
            "IDENTITY ({}, {})",
            start_with.unwrap_or(1),
            increment_by.unwrap_or(1)
        )
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn supports_auto_increment(&self) -> bool {
        true
    }

    fn supports_clustered_primary_key(&self) -> bool {
        true
    }
}
