//! Ordered, keyed SQL fragments.
//!
//! [`StringClauses`] is the unit of incremental SQL assembly used by the
//! action logic. Fragments are kept in insertion order; a fragment appended
//! under a key can later be replaced in place, which lets a dialect-specific
//! strategy swap a single clause (for example the nullability clause) while
//! reusing the rest of a generic statement.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single fragment of a clause sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Optional key used for in-place replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// SQL text of the fragment.
    pub text: String,
}

/// An ordered list of optionally keyed SQL fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringClauses {
    clauses: Vec<Clause>,
}

impl StringClauses {
    /// Creates an empty clause sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Appends an unkeyed fragment at the end.
    ///
    /// Unkeyed fragments are never collapsed, even when the text repeats.
    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        self.clauses.push(Clause {
            key: None,
            text: text.into(),
        });
        self
    }

    /// Appends a keyed fragment, replacing the existing fragment with the
    /// same key in place.
    pub fn append_keyed(&mut self, key: impl Into<String>, text: impl Into<String>) -> &mut Self {
        let key = key.into();
        let text = text.into();

        if let Some(existing) = self
            .clauses
            .iter_mut()
            .find(|c| c.key.as_deref() == Some(key.as_str()))
        {
            existing.text = text;
        } else {
            self.clauses.push(Clause {
                key: Some(key),
                text,
            });
        }
        self
    }

    /// Appends `text` if present, otherwise does nothing.
    pub fn append_opt(&mut self, text: Option<impl Into<String>>) -> &mut Self {
        if let Some(text) = text {
            self.append(text);
        }
        self
    }

    /// Returns the text stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.clauses
            .iter()
            .find(|c| c.key.as_deref() == Some(key))
            .map(|c| c.text.as_str())
    }

    /// Removes the fragment stored under `key`, returning its text.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self
            .clauses
            .iter()
            .position(|c| c.key.as_deref() == Some(key))?;
        Some(self.clauses.remove(index).text)
    }

    /// Returns true if a fragment is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of fragments, including empty ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if there are no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates over the fragments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Joins all non-empty fragments with single spaces.
    #[must_use]
    pub fn render(&self) -> String {
        self.clauses
            .iter()
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for StringClauses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<S: Into<String>> FromIterator<S> for StringClauses {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut clauses = Self::new();
        for text in iter {
            clauses.append(text);
        }
        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_in_insertion_order() {
        let mut clauses = StringClauses::new();
        clauses.append("ADD").append("\"age\"").append("INTEGER");
        assert_eq!(clauses.render(), "ADD \"age\" INTEGER");
    }

    #[test]
    fn test_keyed_replace_keeps_position() {
        let mut clauses = StringClauses::new();
        clauses
            .append("ADD \"age\" INTEGER")
            .append_keyed("nullable", "NOT NULL")
            .append("PRIMARY KEY");

        clauses.append_keyed("nullable", "NULL");

        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses.get("nullable"), Some("NULL"));
        assert_eq!(clauses.render(), "ADD \"age\" INTEGER NULL PRIMARY KEY");
    }

    #[test]
    fn test_keyed_append_twice_same_length_as_once() {
        let mut once = StringClauses::new();
        once.append("A").append_keyed("k", "first");

        let mut twice = StringClauses::new();
        twice
            .append("A")
            .append_keyed("k", "first")
            .append_keyed("k", "second");

        assert_eq!(once.len(), twice.len());
        assert_eq!(twice.render(), "A second");
    }

    #[test]
    fn test_unkeyed_duplicates_are_kept() {
        let mut clauses = StringClauses::new();
        clauses.append("DEFERRABLE").append("DEFERRABLE");
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses.render(), "DEFERRABLE DEFERRABLE");
    }

    #[test]
    fn test_empty_fragments_are_skipped() {
        let mut clauses = StringClauses::new();
        clauses
            .append("ADD \"id\" SERIAL")
            .append("")
            .append_keyed("nullable", "  ")
            .append("PRIMARY KEY");
        assert_eq!(clauses.len(), 4);
        assert_eq!(clauses.to_string(), "ADD \"id\" SERIAL PRIMARY KEY");
    }

    #[test]
    fn test_remove_and_append_opt() {
        let mut clauses: StringClauses = ["UNIQUE", "(\"a\")"].into_iter().collect();
        clauses.append_keyed("tablespace", "USING INDEX TABLESPACE ts");
        clauses.append_opt(None::<String>);
        clauses.append_opt(Some("DISABLE"));

        assert_eq!(clauses.remove("tablespace").as_deref(), Some("USING INDEX TABLESPACE ts"));
        assert!(!clauses.contains_key("tablespace"));
        assert_eq!(clauses.render(), "UNIQUE (\"a\") DISABLE");
    }
}
