//! Changelog runner.
//!
//! [`ChangeRunner`] walks every registered changelog in registration order
//! and every change set in its execution order. A change set is executed
//! when the ledger has no entry for it, or on every run when it is marked
//! run-always; only first applications are recorded. A change that fails is
//! reported and the run moves on; errors that concern the run as a whole
//! (ledger access, a changelog that cannot be built, an ambiguous logic
//! registration) stop it. The ledger is closed exactly once in every case.

use std::fmt;

use oxide_action::action::Action;
use oxide_action::dialect::{dialect_for, Dialect};
use oxide_action::error::ActionError;
use oxide_action::logic::{Scope, Sql};
use oxide_action::registry::LogicRegistry;
use tracing::{debug, error, info, warn};

use crate::changelog::{ChangeLog, ChangeLogRegistry, ChangeScope, ChangeSet, ChangeWork, QueuedWork};
use crate::config::RunnerConfig;
use crate::database::SqlExecutor;
use crate::entry::ChangeEntry;
use crate::error::{ChangelogError, Result};
use crate::store::LedgerStore;

/// What happened to one change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    /// Executed for the first time and recorded.
    Applied,
    /// Already recorded, executed again because it is run-always.
    Reapplied,
    /// Already recorded, not executed.
    Skipped,
    /// Execution failed.
    Failed(String),
}

impl ChangeStatus {
    /// Whether the change failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Reapplied => f.write_str("reapplied"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of one change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Changelog name.
    pub change_log: String,
    /// Change set id.
    pub change_id: String,
    /// Status.
    pub status: ChangeStatus,
}

/// Outcomes of a run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One outcome per change set that was reached.
    pub outcomes: Vec<ChangeOutcome>,
}

impl RunReport {
    /// Whether no change failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(|o| o.status.is_failed())
    }

    /// Outcomes of failed changes.
    pub fn failures(&self) -> impl Iterator<Item = &ChangeOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed())
    }

    /// Number of outcomes with `status`.
    #[must_use]
    pub fn count(&self, status: &ChangeStatus) -> usize {
        self.outcomes.iter().filter(|o| &o.status == status).count()
    }

    /// Status of `change_id`, if it was reached.
    #[must_use]
    pub fn status_of(&self, change_id: &str) -> Option<&ChangeStatus> {
        self.outcomes
            .iter()
            .find(|o| o.change_id == change_id)
            .map(|o| &o.status)
    }
}

/// Runs registered changelogs against a ledger and a database.
pub struct ChangeRunner<S, E> {
    config: RunnerConfig,
    change_logs: ChangeLogRegistry,
    logic: LogicRegistry,
    store: S,
    executor: E,
}

impl<S: LedgerStore, E: SqlExecutor> ChangeRunner<S, E> {
    /// Creates a runner using the default logic registry.
    #[must_use]
    pub fn new(config: RunnerConfig, change_logs: ChangeLogRegistry, store: S, executor: E) -> Self {
        Self {
            config,
            change_logs,
            logic: LogicRegistry::default(),
            store,
            executor,
        }
    }

    /// Replaces the logic registry.
    #[must_use]
    pub fn with_logic(mut self, logic: LogicRegistry) -> Self {
        self.logic = logic;
        self
    }

    /// The ledger store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The SQL executor.
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// The configuration.
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Consumes the runner, returning the store and executor.
    pub fn into_parts(self) -> (S, E) {
        (self.store, self.executor)
    }

    /// Runs every registered changelog.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. Failures of single changes are
    /// reported in the returned [`RunReport`] instead.
    pub async fn run(&mut self) -> Result<RunReport> {
        if !self.config.enabled {
            info!("Change runner is disabled");
            return Ok(RunReport::default());
        }

        self.config.validate()?;
        if self.change_logs.is_empty() {
            return Err(ChangelogError::Configuration(
                "no changelog registered".to_string(),
            ));
        }

        info!(
            dialect = %self.config.dialect,
            dry_run = self.config.dry_run,
            change_logs = self.change_logs.len(),
            "Starting change run"
        );

        let mut report = RunReport::default();
        let result = match self
            .store
            .connect(&self.config.url, &self.config.credentials)
            .await
        {
            Ok(()) => self.run_change_logs(&mut report).await,
            Err(e) => Err(e),
        };

        let closed = self.store.close().await;
        info!("Ledger closed");

        result?;
        closed?;

        info!(
            applied = report.count(&ChangeStatus::Applied),
            reapplied = report.count(&ChangeStatus::Reapplied),
            skipped = report.count(&ChangeStatus::Skipped),
            failed = report.failures().count(),
            "Change run finished"
        );
        Ok(report)
    }

    async fn run_change_logs(&mut self, report: &mut RunReport) -> Result<()> {
        let dialect = dialect_for(self.config.dialect);

        for index in 0..self.change_logs.len() {
            let change_log = self.change_logs.build(index)?;
            let change_sets = change_log.ordered_change_sets()?;
            info!(
                change_log = %change_log.name(),
                change_sets = change_sets.len(),
                "Running changelog"
            );

            for change_set in change_sets {
                let status = self.run_change(&change_log, change_set, &*dialect).await?;
                report.outcomes.push(ChangeOutcome {
                    change_log: change_log.name().to_string(),
                    change_id: change_set.id.clone(),
                    status,
                });
            }
        }
        Ok(())
    }

    async fn run_change(
        &mut self,
        change_log: &ChangeLog,
        change_set: &ChangeSet,
        dialect: &dyn Dialect,
    ) -> Result<ChangeStatus> {
        let entry = ChangeEntry::new(change_log.name(), change_set);

        let status = if self.store.is_new_change(&entry).await? {
            ChangeStatus::Applied
        } else if change_set.run_always {
            ChangeStatus::Reapplied
        } else {
            info!(entry = %entry, "Change passed over");
            return Ok(ChangeStatus::Skipped);
        };

        match self.execute_work(change_set, dialect).await {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!(entry = %entry, error = %e, "Change failed");
                return Ok(ChangeStatus::Failed(e.to_string()));
            }
        }

        if status == ChangeStatus::Applied {
            if self.config.dry_run {
                debug!(entry = %entry, "Dry run, ledger entry not saved");
            } else {
                self.store.save(&entry).await?;
            }
            info!(entry = %entry, "Change applied");
        } else {
            info!(entry = %entry, "Change reapplied");
        }
        Ok(status)
    }

    async fn execute_work(&mut self, change_set: &ChangeSet, dialect: &dyn Dialect) -> Result<()> {
        let id = change_set.id.as_str();
        match &change_set.work {
            ChangeWork::Actions(actions) => {
                for action in actions {
                    self.submit_action(id, action, dialect).await?;
                }
            }
            ChangeWork::Run(_) | ChangeWork::RunWithScope(_) if self.config.dry_run => {
                warn!(change_id = %id, "Dry run, callable not invoked");
            }
            ChangeWork::Run(run) => {
                run().map_err(|source| ChangelogError::ChangeExecution {
                    change_id: id.to_string(),
                    source,
                })?;
            }
            ChangeWork::RunWithScope(run) => {
                let mut scope = ChangeScope::new(dialect, id);
                run(&mut scope).map_err(|source| ChangelogError::ChangeExecution {
                    change_id: id.to_string(),
                    source,
                })?;
                for queued in scope.into_queued() {
                    match queued {
                        QueuedWork::Action(action) => {
                            self.submit_action(id, &action, dialect).await?;
                        }
                        QueuedWork::Sql(sql) => self.submit_sql(id, &Sql::new(sql)).await?,
                    }
                }
            }
        }
        Ok(())
    }

    async fn submit_action(&mut self, id: &str, action: &Action, dialect: &dyn Dialect) -> Result<()> {
        let statements = self
            .logic
            .execute(action, &Scope::new(dialect))
            .map_err(|e| action_error(id, e))?;
        for sql in &statements {
            self.submit_sql(id, sql).await?;
        }
        Ok(())
    }

    async fn submit_sql(&mut self, id: &str, sql: &Sql) -> Result<()> {
        self.executor
            .execute(sql)
            .await
            .map_err(|e| ChangelogError::change_execution(id, e))
    }
}

/// Resolution conflicts stop the run; anything else fails only this change.
fn action_error(change_id: &str, err: ActionError) -> ChangelogError {
    if err.is_resolution_conflict() {
        ChangelogError::Action(err)
    } else {
        ChangelogError::change_execution(change_id, err)
    }
}

impl<S, E> fmt::Debug for ChangeRunner<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeRunner")
            .field("config", &self.config)
            .field("change_logs", &self.change_logs)
            .finish_non_exhaustive()
    }
}
