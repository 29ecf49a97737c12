#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oxide_action::prelude::*;
use oxide_changelog::prelude::*;
use oxide_changelog::Result;

/// Records statements and fails on any statement containing `fail_on`.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub statements: Vec<String>,
    pub fail_on: Option<String>,
}

impl RecordingExecutor {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            statements: Vec::new(),
            fail_on: Some(pattern.to_string()),
        }
    }
}

impl SqlExecutor for RecordingExecutor {
    async fn execute(&mut self, sql: &Sql) -> Result<()> {
        if let Some(pattern) = &self.fail_on {
            if sql.as_str().contains(pattern.as_str()) {
                return Err(ChangelogError::Io(std::io::Error::other(format!(
                    "rejected: {sql}"
                ))));
            }
        }
        self.statements.push(sql.as_str().to_string());
        Ok(())
    }
}

/// Ledger whose `connect` always fails; counts closes.
#[derive(Debug, Default)]
pub struct UnreachableLedger {
    pub close_count: usize,
}

impl LedgerStore for UnreachableLedger {
    async fn connect(&mut self, _url: &str, _credentials: &Credentials) -> Result<()> {
        Err(ChangelogError::Io(std::io::Error::other(
            "ledger table could not be created",
        )))
    }

    async fn is_new_change(&self, _entry: &ChangeEntry) -> Result<bool> {
        Err(ChangelogError::NotConnected)
    }

    async fn save(&mut self, _entry: &ChangeEntry) -> Result<()> {
        Err(ChangelogError::NotConnected)
    }

    async fn close(&mut self) -> Result<()> {
        self.close_count += 1;
        Ok(())
    }
}

/// Shared invocation counter for callables.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn sql_change(id: &str, order: i32, sql: &str) -> ChangeSet {
    ChangeSet::new(id, "alice")
        .order(order)
        .actions(vec![Action::execute_sql(sql)])
}

pub fn counting_change(id: &str, counter: &Counter) -> ChangeSet {
    let counter = counter.clone();
    ChangeSet::new(id, "alice").run(move || {
        counter.hit();
        Ok(())
    })
}

pub fn registry_of(change_logs: Vec<ChangeLog>) -> ChangeLogRegistry {
    let mut registry = ChangeLogRegistry::new();
    for change_log in change_logs {
        registry.register_change_log(change_log);
    }
    registry
}

pub fn memory_config() -> RunnerConfig {
    RunnerConfig::new("memory").with_dialect(DialectKind::Sqlite)
}

/// Runs `change_logs` once against `store`, returning the store afterwards.
pub async fn run_once<E: SqlExecutor>(
    config: RunnerConfig,
    change_logs: ChangeLogRegistry,
    store: MemoryLedgerStore,
    executor: E,
) -> (Result<RunReport>, MemoryLedgerStore, E) {
    let mut runner = ChangeRunner::new(config, change_logs, store, executor);
    let result = runner.run().await;
    let (store, executor) = runner.into_parts();
    (result, store, executor)
}

pub fn statuses(report: &RunReport) -> Vec<(String, ChangeStatus)> {
    report
        .outcomes
        .iter()
        .map(|o| (o.change_id.clone(), o.status.clone()))
        .collect()
}
