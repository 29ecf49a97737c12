//! Parsing of abstract data type descriptions.

/// A data type description split into name and parameters.
///
/// `decimal(10, 2)` parses to name `decimal` with parameters `["10", "2"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeDescription {
    /// Lowercased type name.
    pub name: String,
    /// Parameters, trimmed.
    pub parameters: Vec<String>,
    /// The description as given.
    pub original: String,
}

impl DataTypeDescription {
    /// Parses a description. Input without a well-formed parameter list is
    /// kept whole as the name.
    #[must_use]
    pub fn parse(description: &str) -> Self {
        let original = description.trim().to_string();

        let (name, parameters) = match original.split_once('(') {
            Some((name, rest)) if rest.ends_with(')') => {
                let inner = &rest[..rest.len() - 1];
                let parameters = inner
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(ToString::to_string)
                    .collect();
                (name.trim(), parameters)
            }
            _ => (original.as_str(), Vec::new()),
        };

        Self {
            name: name.to_ascii_lowercase(),
            parameters,
            original: original.clone(),
        }
    }

    /// Returns the parenthesized parameter list, or an empty string.
    #[must_use]
    pub fn parameter_list(&self) -> String {
        if self.parameters.is_empty() {
            String::new()
        } else {
            format!("({})", self.parameters.join(", "))
        }
    }

    /// Renders `NAME` followed by the parameter list.
    #[must_use]
    pub fn with_name(&self, name: &str) -> String {
        format!("{name}{}", self.parameter_list())
    }

    /// Renders the type using standard SQL names; unknown names pass through.
    #[must_use]
    pub fn to_standard_sql(&self) -> String {
        match self.name.as_str() {
            "int" | "integer" | "int4" => "INTEGER".to_string(),
            "bigint" | "int8" | "long" => "BIGINT".to_string(),
            "smallint" | "int2" | "short" => "SMALLINT".to_string(),
            "bool" | "boolean" => "BOOLEAN".to_string(),
            "varchar" | "string" => self.with_name("VARCHAR"),
            "char" => self.with_name("CHAR"),
            "text" | "clob" => "CLOB".to_string(),
            "decimal" | "numeric" => self.with_name("DECIMAL"),
            "float" | "real" => "REAL".to_string(),
            "double" => "DOUBLE PRECISION".to_string(),
            "date" => "DATE".to_string(),
            "time" => "TIME".to_string(),
            "datetime" | "timestamp" => "TIMESTAMP".to_string(),
            "blob" | "binary" => "BLOB".to_string(),
            _ => self.original.clone(),
        }
    }
}
