//! Database dialects: capability flags, identifier escaping, and type
//! rendering.
//!
//! Action logic never hardcodes database behavior. It asks the target
//! [`Dialect`] whether a feature is available and how names and types are
//! spelled.

mod datatype;
mod generic;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use datatype::DataTypeDescription;
pub use generic::GenericDialect;
pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::action::DefaultValue;
use crate::name::ObjectName;

/// Identifies a dialect family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// ANSI SQL without optional features.
    #[default]
    Generic,
    /// SQLite.
    Sqlite,
    /// PostgreSQL.
    Postgres,
    /// MySQL / MariaDB.
    MySql,
    /// Microsoft SQL Server.
    Mssql,
    /// Oracle Database.
    Oracle,
}

impl DialectKind {
    /// All known kinds.
    pub const ALL: [Self; 6] = [
        Self::Generic,
        Self::Sqlite,
        Self::Postgres,
        Self::MySql,
        Self::Mssql,
        Self::Oracle,
    ];

    /// Short name of the dialect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Mssql => "mssql",
            Self::Oracle => "oracle",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect: {0}")]
pub struct UnknownDialect(pub String);

impl FromStr for DialectKind {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Self::Generic),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "mssql" | "sqlserver" => Ok(Self::Mssql),
            "oracle" => Ok(Self::Oracle),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Returns the built-in dialect for `kind`.
#[must_use]
pub fn dialect_for(kind: DialectKind) -> Box<dyn Dialect> {
    match kind {
        DialectKind::Generic => Box::new(GenericDialect::new()),
        DialectKind::Sqlite => Box::new(SqliteDialect::new()),
        DialectKind::Postgres => Box::new(PostgresDialect::new()),
        DialectKind::MySql => Box::new(MySqlDialect::new()),
        DialectKind::Mssql => Box::new(MssqlDialect::new()),
        DialectKind::Oracle => Box::new(OracleDialect::new()),
    }
}

/// Dialect-specific capabilities and spelling.
pub trait Dialect: Send + Sync {
    /// Dialect family.
    fn kind(&self) -> DialectKind;

    /// Short name used in messages.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quotes a single identifier, doubling embedded closing quotes.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        let escaped = name.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Escapes a possibly qualified object name.
    fn escape_object_name(&self, name: &ObjectName) -> String {
        name.segments()
            .into_iter()
            .map(|segment| self.quote_identifier(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Escapes a column name.
    fn escape_column_name(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    /// Escapes a constraint name.
    fn escape_constraint_name(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    /// Escapes and comma-joins column names.
    fn escape_column_name_list(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| self.escape_column_name(name.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders an abstract type description such as `varchar(255)`.
    fn data_type(&self, description: &str, auto_increment: bool) -> String {
        self.render_data_type(&DataTypeDescription::parse(description), auto_increment)
    }

    /// Renders a parsed type description.
    fn render_data_type(&self, data_type: &DataTypeDescription, _auto_increment: bool) -> String {
        data_type.to_standard_sql()
    }

    /// Auto-increment clause for a column definition.
    fn auto_increment_clause(&self, _start_with: Option<i64>, _increment_by: Option<i64>) -> String {
        String::new()
    }

    /// Renders a default value literal.
    fn default_value_sql(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Null => "NULL".to_string(),
            DefaultValue::Boolean(b) => self.boolean_literal(*b).to_string(),
            DefaultValue::Integer(i) => i.to_string(),
            DefaultValue::Float(f) => f.to_string(),
            DefaultValue::String(s) => format!("'{}'", s.replace('\'', "''")),
            DefaultValue::Computed(expr) => expr.clone(),
        }
    }

    /// Boolean literal.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    /// Whether auto-increment columns can be declared.
    fn supports_auto_increment(&self) -> bool {
        false
    }

    /// Whether index tablespaces can be specified.
    fn supports_tablespaces(&self) -> bool {
        false
    }

    /// Whether nullable columns must be declared with an explicit `NULL`.
    fn requires_explicit_null(&self) -> bool {
        false
    }

    /// Whether constraints can be `DEFERRABLE` / `INITIALLY DEFERRED`.
    fn supports_initially_deferrable_columns(&self) -> bool {
        false
    }

    /// Whether primary keys can be declared clustered.
    fn supports_clustered_primary_key(&self) -> bool {
        false
    }
}
