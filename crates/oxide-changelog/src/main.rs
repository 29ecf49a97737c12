//! oxide-changelog CLI
//!
//! Command-line tool for inspecting the changelog ledger and applying
//! changelogs described in JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use oxide_action::prelude::*;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_changelog::prelude::*;

/// Idempotent schema changelogs.
#[derive(Parser)]
#[command(name = "oxide-changelog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Target SQL dialect.
    #[arg(long, default_value = "sqlite")]
    dialect: DialectKind,

    /// Runner configuration file (JSON). Overrides --database and --dialect.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ledger table.
    Init,

    /// List applied changes.
    Status {
        /// Only show changes from this changelog.
        #[arg(long)]
        change_log: Option<String>,
    },

    /// Print the SQL for an action.
    Render {
        /// JSON file holding one action.
        #[arg(short, long)]
        action: PathBuf,
    },

    /// Apply a changelog.
    ///
    /// Changes are executed against SQLite only; other dialects are
    /// accepted with --dry-run to print their SQL.
    Update {
        /// JSON file holding the changelog.
        #[arg(long)]
        change_log: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    fn runner_config(&self) -> anyhow::Result<RunnerConfig> {
        match &self.config {
            Some(path) => Ok(RunnerConfig::from_file(path)?),
            None => Ok(RunnerConfig::new(&self.database).with_dialect(self.dialect)),
        }
    }
}

async fn update<E: SqlExecutor>(
    config: RunnerConfig,
    change_logs: ChangeLogRegistry,
    executor: E,
) -> anyhow::Result<()> {
    let mut runner = ChangeRunner::new(config, change_logs, SqliteLedgerStore::new(), executor);
    let report = runner.run().await?;

    for outcome in &report.outcomes {
        println!(
            " [{}] {}/{}",
            outcome.status, outcome.change_log, outcome.change_id
        );
    }

    if report.is_success() {
        Ok(())
    } else {
        anyhow::bail!("{} change(s) failed", report.failures().count())
    }
}

/// Rejects executing changes on a database this tool cannot reach.
fn check_update_target(config: &RunnerConfig) -> anyhow::Result<()> {
    if !config.dry_run && config.dialect != DialectKind::Sqlite {
        anyhow::bail!(
            "update executes against SQLite only; use --dry-run to print {} SQL",
            config.dialect
        );
    }
    Ok(())
}

fn read_change_log(path: &Path) -> anyhow::Result<ChangeLog> {
    let json = std::fs::read_to_string(path)?;
    Ok(ChangeLogDocument::from_json(&json)?.into_change_log())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.runner_config()?;
    config.validate()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing changelog ledger...");
            let mut store = SqliteLedgerStore::new();
            store.connect(&config.url, &config.credentials).await?;
            store.close().await?;
            info!("Ledger table created successfully.");
        }

        Commands::Status { change_log } => {
            let mut store = SqliteLedgerStore::new();
            store.connect(&config.url, &config.credentials).await?;
            let entries = store.entries().await;
            store.close().await?;
            let entries = entries?;

            if entries.is_empty() {
                info!("No changes have been applied yet.");
            } else {
                println!("\nApplied changes:");
                println!("{:-<60}", "");

                for entry in &entries {
                    if let Some(target) = &change_log {
                        if &entry.change_log != target {
                            continue;
                        }
                    }
                    println!(
                        " [X] {}/{} by {} ({})",
                        entry.change_log,
                        entry.change_id,
                        entry.author,
                        entry.applied_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
                println!();
            }
        }

        Commands::Render { action } => {
            let json = std::fs::read_to_string(&action)?;
            let action: Action = serde_json::from_str(&json)?;
            let dialect = dialect_for(config.dialect);

            let statements = LogicRegistry::default().execute(&action, &Scope::new(&*dialect))?;
            for sql in statements {
                println!("{sql};");
            }
        }

        Commands::Update {
            change_log,
            dry_run,
        } => {
            let change_log = read_change_log(&change_log)?;
            let mut change_logs = ChangeLogRegistry::new();
            change_logs.register_change_log(change_log);

            let config = if dry_run {
                config.with_dry_run(true)
            } else {
                config
            };
            check_update_target(&config)?;

            if config.dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
                update(config, change_logs, DryRunExecutor::printing()).await?;
            } else {
                if !config.credentials.is_empty() {
                    warn!("Target database credentials are taken from the URL");
                }
                let executor = SqliteExecutor::connect(&config.url).await?;
                update(config, change_logs, executor).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_target_requires_sqlite_unless_dry_run() {
        let sqlite = RunnerConfig::new("sqlite:app.db").with_dialect(DialectKind::Sqlite);
        assert!(check_update_target(&sqlite).is_ok());

        let postgres = RunnerConfig::new("sqlite:app.db").with_dialect(DialectKind::Postgres);
        let err = check_update_target(&postgres).unwrap_err();
        assert!(err.to_string().contains("--dry-run"));
        assert!(check_update_target(&postgres.with_dry_run(true)).is_ok());
    }
}
