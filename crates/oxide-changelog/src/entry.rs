//! Ledger entries.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::changelog::ChangeSet;

/// Prefix of every ledger key.
pub const KEY_PREFIX: &str = "ChangeEntry::";

/// Record of one applied change set.
///
/// Two entries are the same change when their ids match; the remaining
/// fields are informational metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Change set id.
    pub change_id: String,
    /// Author of the change set.
    pub author: String,
    /// When the change was first applied.
    pub applied_at: DateTime<Utc>,
    /// Name of the changelog that declared the change.
    pub change_log: String,
    /// Name of the unit of work inside the changelog.
    pub unit_name: String,
    /// Optional free-form comment.
    pub comment: Option<String>,
}

impl ChangeEntry {
    /// Creates an entry for `change_set` declared in `change_log`, stamped now.
    #[must_use]
    pub fn new(change_log: &str, change_set: &ChangeSet) -> Self {
        Self {
            change_id: change_set.id.clone(),
            author: change_set.author.clone(),
            applied_at: Utc::now(),
            change_log: change_log.to_string(),
            unit_name: change_set.unit_name.clone(),
            comment: change_set.comment.clone(),
        }
    }

    /// Ledger key: `ChangeEntry::<change_id>`.
    #[must_use]
    pub fn key(&self) -> String {
        key_for(&self.change_id)
    }
}

/// Ledger key for `change_id`.
#[must_use]
pub fn key_for(change_id: &str) -> String {
    format!("{KEY_PREFIX}{change_id}")
}

impl PartialEq for ChangeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.change_id == other.change_id
    }
}

impl Eq for ChangeEntry {}

impl Hash for ChangeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.change_id.hash(state);
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ChangeSet: id={}, author={}, changeLog={}, changeSet={}]",
            self.change_id, self.author, self.change_log, self.unit_name
        )
    }
}
