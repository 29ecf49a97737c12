//! In-memory ledger.

use super::{Credentials, LedgerStore};
use crate::entry::ChangeEntry;
use crate::error::{ChangelogError, Result};

/// Ledger kept in memory, for tests and embedding.
///
/// Entries survive `close`, so one store can serve several runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedgerStore {
    entries: Vec<ChangeEntry>,
    connected: bool,
    connect_count: usize,
    close_count: usize,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Whether an entry exists for `change_id`.
    #[must_use]
    pub fn contains(&self, change_id: &str) -> bool {
        self.entries.iter().any(|e| e.change_id == change_id)
    }

    /// Whether the store is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of `connect` calls.
    #[must_use]
    pub const fn connect_count(&self) -> usize {
        self.connect_count
    }

    /// Number of `close` calls.
    #[must_use]
    pub const fn close_count(&self) -> usize {
        self.close_count
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(ChangelogError::NotConnected)
        }
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn connect(&mut self, _url: &str, _credentials: &Credentials) -> Result<()> {
        self.connected = true;
        self.connect_count += 1;
        Ok(())
    }

    async fn is_new_change(&self, entry: &ChangeEntry) -> Result<bool> {
        self.ensure_connected()?;
        Ok(!self.entries.contains(entry))
    }

    async fn save(&mut self, entry: &ChangeEntry) -> Result<()> {
        self.ensure_connected()?;
        if !self.entries.contains(entry) {
            self.entries.push(entry.clone());
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.close_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::ChangeSet;
    use tokio_test::block_on;

    fn entry(id: &str, author: &str) -> ChangeEntry {
        ChangeEntry::new("accounts", &ChangeSet::new(id, author))
    }

    #[test]
    fn test_requires_connect() {
        let mut store = MemoryLedgerStore::new();
        assert!(matches!(
            block_on(store.save(&entry("0001", "alice"))),
            Err(ChangelogError::NotConnected)
        ));

        block_on(store.connect("memory", &Credentials::default())).unwrap();
        block_on(store.save(&entry("0001", "alice"))).unwrap();
        assert!(store.contains("0001"));
    }

    #[test]
    fn test_save_is_idempotent() {
        let mut store = MemoryLedgerStore::new();
        block_on(store.connect("memory", &Credentials::default())).unwrap();

        block_on(store.save(&entry("0001", "alice"))).unwrap();
        block_on(store.save(&entry("0001", "bob"))).unwrap();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].author, "alice");
        assert!(!block_on(store.is_new_change(&entry("0001", "carol"))).unwrap());
    }

    #[test]
    fn test_entries_survive_close() {
        let mut store = MemoryLedgerStore::new();
        block_on(store.connect("memory", &Credentials::default())).unwrap();
        block_on(store.save(&entry("0001", "alice"))).unwrap();
        block_on(store.close()).unwrap();

        assert!(!store.is_connected());
        assert_eq!(store.close_count(), 1);
        assert!(store.contains("0001"));
    }
}
