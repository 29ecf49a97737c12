//! Ledger stores.
//!
//! The ledger records which change sets have been applied. The runner opens
//! the store once per run, asks it about each change before executing it,
//! saves an entry after each first successful application, and closes it when
//! the run ends, whether the run succeeded or not.

mod memory;
mod sqlite;

pub use memory::MemoryLedgerStore;
pub(crate) use sqlite::sqlite_pool;
pub use sqlite::{SqliteLedgerStore, CREATE_LEDGER_TABLE_SQL};

pub use crate::config::Credentials;
use crate::entry::ChangeEntry;
use crate::error::Result;

/// Durable record of applied changes.
///
/// A store is used by a single run at a time; implementations need no
/// locking of their own.
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Opens the store.
    async fn connect(&mut self, url: &str, credentials: &Credentials) -> Result<()>;

    /// Whether no entry exists for the change id of `entry`.
    async fn is_new_change(&self, entry: &ChangeEntry) -> Result<bool>;

    /// Records `entry`. Saving a key that already exists leaves the stored
    /// entry untouched.
    async fn save(&mut self, entry: &ChangeEntry) -> Result<()>;

    /// Closes the store.
    async fn close(&mut self) -> Result<()>;
}
