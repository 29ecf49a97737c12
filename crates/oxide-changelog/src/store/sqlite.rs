//! SQLite ledger.
//!
//! This module manages the `oxide_changelog` table that records which change
//! sets have been applied to the database.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use super::{Credentials, LedgerStore};
use crate::entry::ChangeEntry;
use crate::error::{ChangelogError, Result};

/// SQL to create the ledger table (SQLite).
pub const CREATE_LEDGER_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS oxide_changelog (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    change_key TEXT NOT NULL UNIQUE,
    change_id TEXT NOT NULL,
    author TEXT NOT NULL,
    change_log TEXT NOT NULL,
    unit_name TEXT NOT NULL,
    comment TEXT,
    applied_at TEXT NOT NULL
)
";

type EntryRow = (String, String, String, String, Option<String>, String);

/// Ledger stored in a SQLite table.
#[derive(Debug, Default)]
pub struct SqliteLedgerStore {
    pool: Option<SqlitePool>,
    shared: bool,
}

impl SqliteLedgerStore {
    /// Creates an unconnected store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store over an existing pool. The table is created on
    /// [`connect`](LedgerStore::connect) or [`ensure_table`](Self::ensure_table).
    ///
    /// Closing the store leaves the pool open and attached, so a later
    /// [`connect`](LedgerStore::connect) reuses it instead of the url.
    #[must_use]
    pub const fn with_pool(pool: SqlitePool) -> Self {
        Self {
            pool: Some(pool),
            shared: true,
        }
    }

    /// Whether the store holds an open pool.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or(ChangelogError::NotConnected)
    }

    /// Ensures the ledger table exists.
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(CREATE_LEDGER_TABLE_SQL)
            .execute(self.pool()?)
            .await?;
        Ok(())
    }

    /// Gets all entries in the order they were saved.
    pub async fn entries(&self) -> Result<Vec<ChangeEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT change_id, author, change_log, unit_name, comment, applied_at \
             FROM oxide_changelog ORDER BY id",
        )
        .fetch_all(self.pool()?)
        .await?;

        rows.into_iter().map(entry_from_row).collect()
    }

    /// Counts entries.
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM oxide_changelog")
            .fetch_one(self.pool()?)
            .await?;
        Ok(row.0)
    }
}

/// Opens a single-connection pool, creating the database file if missing.
pub(crate) async fn sqlite_pool(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

fn entry_from_row(row: EntryRow) -> Result<ChangeEntry> {
    let (change_id, author, change_log, unit_name, comment, applied_at_str) = row;
    let applied_at = match DateTime::parse_from_rfc3339(&applied_at_str) {
        Ok(dt) => dt.with_timezone(&Utc),
        // SQLite datetime format fallback
        Err(_) => chrono::NaiveDateTime::parse_from_str(&applied_at_str, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.and_utc())
            .map_err(|e| {
                ChangelogError::Ledger(format!(
                    "invalid applied_at '{applied_at_str}' for change '{change_id}': {e}"
                ))
            })?,
    };

    Ok(ChangeEntry {
        change_id,
        author,
        applied_at,
        change_log,
        unit_name,
        comment,
    })
}

impl LedgerStore for SqliteLedgerStore {
    async fn connect(&mut self, url: &str, credentials: &Credentials) -> Result<()> {
        if self.pool.is_none() {
            if !credentials.is_empty() {
                debug!("SQLite ignores ledger credentials");
            }
            self.pool = Some(sqlite_pool(url).await?);
        }
        self.ensure_table().await
    }

    async fn is_new_change(&self, entry: &ChangeEntry) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM oxide_changelog WHERE change_key = ?")
                .bind(entry.key())
                .fetch_optional(self.pool()?)
                .await?;

        Ok(row.is_none())
    }

    async fn save(&mut self, entry: &ChangeEntry) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO oxide_changelog \
             (change_key, change_id, author, change_log, unit_name, comment, applied_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.key())
        .bind(&entry.change_id)
        .bind(&entry.author)
        .bind(&entry.change_log)
        .bind(&entry.unit_name)
        .bind(&entry.comment)
        .bind(entry.applied_at.to_rfc3339())
        .execute(self.pool()?)
        .await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        // A shared pool belongs to the caller and stays attached for reuse.
        if self.shared {
            return Ok(());
        }
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }
}
