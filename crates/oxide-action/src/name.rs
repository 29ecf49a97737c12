//! Possibly qualified database object names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A database object name with an optional container (schema or catalog).
///
/// Serialized as its dotted form, so `"public.users"` in JSON becomes
/// `ObjectName { container: Some("public"), name: "users" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ObjectName {
    /// Enclosing schema/catalog path, dotted.
    pub container: Option<String>,
    /// Unqualified object name.
    pub name: String,
}

impl ObjectName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            container: None,
            name: name.into(),
        }
    }

    /// Creates a name inside `container`.
    #[must_use]
    pub fn qualified(container: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            container: Some(container.into()),
            name: name.into(),
        }
    }

    /// Parses a dotted name; the last segment is the object name.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.rsplit_once('.') {
            Some((container, name)) if !container.is_empty() => Self::qualified(container, name),
            _ => Self::new(value),
        }
    }

    /// Returns all segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self
            .container
            .as_deref()
            .map(|c| c.split('.').collect())
            .unwrap_or_default();
        segments.push(&self.name);
        segments
    }

    /// Returns true if the unqualified name is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            Some(container) => write!(f, "{container}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<String> for ObjectName {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ObjectName {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ObjectName> for String {
    fn from(value: ObjectName) -> Self {
        value.to_string()
    }
}
