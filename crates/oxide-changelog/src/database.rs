//! SQL submission.

use oxide_action::logic::Sql;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::store::sqlite_pool;

/// Submits rendered SQL to the target database.
#[allow(async_fn_in_trait)]
pub trait SqlExecutor {
    /// Executes one statement.
    async fn execute(&mut self, sql: &Sql) -> Result<()>;
}

/// Executes SQL against a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Creates an executor over `pool`.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `url`, creating the file if missing.
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(sqlite_pool(url).await?))
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl SqlExecutor for SqliteExecutor {
    async fn execute(&mut self, sql: &Sql) -> Result<()> {
        debug!(sql = %sql, "Executing SQL");
        sqlx::query(sql.as_str()).execute(&self.pool).await?;
        Ok(())
    }
}

/// Records statements instead of executing them.
#[derive(Debug, Default, Clone)]
pub struct DryRunExecutor {
    statements: Vec<String>,
    print: bool,
}

impl DryRunExecutor {
    /// Creates an executor that only records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor that also prints each statement to stdout.
    #[must_use]
    pub fn printing() -> Self {
        Self {
            statements: Vec::new(),
            print: true,
        }
    }

    /// Statements received so far.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

impl SqlExecutor for DryRunExecutor {
    async fn execute(&mut self, sql: &Sql) -> Result<()> {
        if self.print {
            println!("{sql};");
        }
        self.statements.push(sql.as_str().to_string());
        Ok(())
    }
}
