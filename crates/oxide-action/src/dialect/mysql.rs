//! MySQL dialect.

use super::{DataTypeDescription, Dialect, DialectKind};

/// MySQL / MariaDB dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn render_data_type(&self, data_type: &DataTypeDescription, _auto_increment: bool) -> String {
        match data_type.name.as_str() {
            "int" | "integer" | "int4" => "INT".to_string(),
            "bool" | "boolean" => "TINYINT(1)".to_string(),
            "text" | "clob" => "LONGTEXT".to_string(),
            "datetime" => "DATETIME".to_string(),
            "double" => "DOUBLE".to_string(),
            "blob" | "binary" => "LONGBLOB".to_string(),
            "uuid" => "CHAR(36)".to_string(),
            "json" => "JSON".to_string(),
            _ => data_type.to_standard_sql(),
        }
    }

    fn auto_increment_clause(&self, _start_with: Option<i64>, _increment_by: Option<i64>) -> String {
        "AUTO_INCREMENT".to_string()
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn supports_auto_increment(&self) -> bool {
        true
    }
}
