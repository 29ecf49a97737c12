//! Idempotent changelog runner.
//!
//! `oxide-changelog` applies declared schema changes exactly once per
//! database:
//! - A [`ChangeLog`](changelog::ChangeLog) groups ordered
//!   [`ChangeSet`](changelog::ChangeSet)s, each carrying actions or code
//! - A [`LedgerStore`](store::LedgerStore) remembers which change sets were
//!   applied
//! - The [`ChangeRunner`](runner::ChangeRunner) executes what is new (and
//!   what is marked run-always), records first applications, and reports
//!   per-change outcomes
//!
//! Actions are turned into SQL by `oxide-action`.
//!
//! # Example
//!
//! ```rust,no_run
//! use oxide_action::prelude::*;
//! use oxide_changelog::prelude::*;
//!
//! # async fn example() -> oxide_changelog::Result<()> {
//! let mut change_logs = ChangeLogRegistry::new();
//! change_logs.register_change_log(
//!     ChangeLog::new("accounts")
//!         .change_set(ChangeSet::new("0001", "alice").actions(vec![Action::execute_sql(
//!             "CREATE TABLE users (id INTEGER PRIMARY KEY)",
//!         )]))
//!         .change_set(ChangeSet::new("0002", "alice").actions(vec![Action::add_columns(
//!             "users",
//!             vec![ColumnDefinition::new("age", "integer").nullable()],
//!         )])),
//! );
//!
//! let config = RunnerConfig::new("sqlite:app.db").with_dialect(DialectKind::Sqlite);
//! let executor = SqliteExecutor::connect("sqlite:app.db").await?;
//! let mut runner = ChangeRunner::new(config, change_logs, SqliteLedgerStore::new(), executor);
//!
//! let report = runner.run().await?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod changelog;
pub mod config;
pub mod database;
pub mod entry;
pub mod error;
pub mod runner;
pub mod store;

pub use error::{ChangelogError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::changelog::{
        ChangeLog, ChangeLogDocument, ChangeLogRegistry, ChangeScope, ChangeSet, ChangeWork,
        DeclaredChangeLog, QueuedWork, WorkResult,
    };
    pub use crate::config::{Credentials, RunnerConfig};
    pub use crate::database::{DryRunExecutor, SqlExecutor, SqliteExecutor};
    pub use crate::entry::ChangeEntry;
    pub use crate::error::{BoxError, ChangelogError};
    pub use crate::runner::{ChangeOutcome, ChangeRunner, ChangeStatus, RunReport};
    pub use crate::store::{LedgerStore, MemoryLedgerStore, SqliteLedgerStore};
}
