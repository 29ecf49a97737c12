//! Declared changes.
//!
//! A [`ChangeLog`] is a named group of [`ChangeSet`]s. Change logs are
//! registered explicitly in a [`ChangeLogRegistry`], either through a type
//! implementing [`DeclaredChangeLog`] or through a factory closure, and are
//! built lazily when the runner reaches them.
//!
//! # Example
//!
//! ```rust
//! use oxide_action::prelude::*;
//! use oxide_changelog::prelude::*;
//!
//! struct Accounts;
//!
//! impl DeclaredChangeLog for Accounts {
//!     const NAME: &'static str = "accounts";
//!
//!     fn build() -> std::result::Result<ChangeLog, BoxError> {
//!         Ok(ChangeLog::new(Self::NAME)
//!             .change_set(
//!                 ChangeSet::new("0001", "alice")
//!                     .order(1)
//!                     .actions(vec![Action::execute_sql(
//!                         "CREATE TABLE users (id INTEGER PRIMARY KEY)",
//!                     )]),
//!             )
//!             .change_set(ChangeSet::new("0002", "alice").order(2).actions(vec![
//!                 Action::add_columns("users", vec![ColumnDefinition::new("age", "integer")]),
//!             ])))
//!     }
//! }
//!
//! let mut registry = ChangeLogRegistry::new();
//! registry.register::<Accounts>();
//! assert_eq!(registry.names(), vec!["accounts"]);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use oxide_action::action::Action;
use oxide_action::dialect::Dialect;
use serde::{Deserialize, Serialize};

use crate::error::{BoxError, ChangelogError, DeclarationError, Result};

/// Result returned by change callables.
pub type WorkResult = std::result::Result<(), BoxError>;

/// Callable taking no arguments.
pub type RunFn = Arc<dyn Fn() -> WorkResult + Send + Sync>;

/// Callable receiving a [`ChangeScope`].
pub type ScopedRunFn = Arc<dyn Fn(&mut ChangeScope<'_>) -> WorkResult + Send + Sync>;

/// The unit of work of a change set.
#[derive(Clone)]
pub enum ChangeWork {
    /// Actions resolved to SQL and submitted in order.
    Actions(Vec<Action>),
    /// Arbitrary code with no access to the database.
    Run(RunFn),
    /// Code that may inspect the dialect and queue actions or raw SQL.
    RunWithScope(ScopedRunFn),
}

impl ChangeWork {
    /// Whether there is nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Actions(actions) if actions.is_empty())
    }

    /// Whether the work is user code rather than declared actions.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        !matches!(self, Self::Actions(_))
    }
}

impl Default for ChangeWork {
    fn default() -> Self {
        Self::Actions(Vec::new())
    }
}

impl fmt::Debug for ChangeWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actions(actions) => f.debug_tuple("Actions").field(actions).finish(),
            Self::Run(_) => f.write_str("Run(..)"),
            Self::RunWithScope(_) => f.write_str("RunWithScope(..)"),
        }
    }
}

/// Work queued by a scoped callable.
#[derive(Debug, Clone, PartialEq)]
pub enum QueuedWork {
    /// An action to resolve.
    Action(Action),
    /// Raw SQL submitted as is.
    Sql(String),
}

/// Context handed to [`ChangeWork::RunWithScope`] callables.
pub struct ChangeScope<'a> {
    dialect: &'a dyn Dialect,
    change_id: &'a str,
    queued: Vec<QueuedWork>,
}

impl<'a> ChangeScope<'a> {
    /// Creates an empty scope.
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect, change_id: &'a str) -> Self {
        Self {
            dialect,
            change_id,
            queued: Vec::new(),
        }
    }

    /// The target dialect.
    #[must_use]
    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    /// Id of the change being executed.
    #[must_use]
    pub const fn change_id(&self) -> &'a str {
        self.change_id
    }

    /// Queues an action.
    pub fn add_action(&mut self, action: impl Into<Action>) -> &mut Self {
        self.queued.push(QueuedWork::Action(action.into()));
        self
    }

    /// Queues raw SQL.
    pub fn add_sql(&mut self, sql: impl Into<String>) -> &mut Self {
        self.queued.push(QueuedWork::Sql(sql.into()));
        self
    }

    /// Work queued so far.
    #[must_use]
    pub fn queued(&self) -> &[QueuedWork] {
        &self.queued
    }

    /// Consumes the scope, returning the queued work in order.
    #[must_use]
    pub fn into_queued(self) -> Vec<QueuedWork> {
        self.queued
    }
}

impl fmt::Debug for ChangeScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeScope")
            .field("dialect", &self.dialect.kind())
            .field("change_id", &self.change_id)
            .field("queued", &self.queued)
            .finish()
    }
}

/// One declared change.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Stable id; the ledger key is derived from it.
    pub id: String,
    /// Author.
    pub author: String,
    /// Position within the changelog.
    pub order: i32,
    /// Re-execute on every run.
    pub run_always: bool,
    /// Leave out of the run entirely.
    pub ignore: bool,
    /// Free-form comment recorded in the ledger.
    pub comment: Option<String>,
    /// Name of the unit of work, recorded in the ledger.
    pub unit_name: String,
    /// What to do.
    pub work: ChangeWork,
}

impl ChangeSet {
    /// Creates a change set with no work. The unit name defaults to the id.
    #[must_use]
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            unit_name: id.clone(),
            id,
            author: author.into(),
            ..Self::default()
        }
    }

    /// Sets the order.
    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Marks the change as run-always.
    #[must_use]
    pub fn run_always(mut self) -> Self {
        self.run_always = true;
        self
    }

    /// Marks the change as ignored.
    #[must_use]
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the unit name.
    #[must_use]
    pub fn unit_name(mut self, name: impl Into<String>) -> Self {
        self.unit_name = name.into();
        self
    }

    /// Uses `actions` as the unit of work.
    #[must_use]
    pub fn actions(mut self, actions: Vec<Action>) -> Self {
        self.work = ChangeWork::Actions(actions);
        self
    }

    /// Uses a callable taking no arguments as the unit of work.
    #[must_use]
    pub fn run<F>(mut self, f: F) -> Self
    where
        F: Fn() -> WorkResult + Send + Sync + 'static,
    {
        self.work = ChangeWork::Run(Arc::new(f));
        self
    }

    /// Uses a callable receiving a [`ChangeScope`] as the unit of work.
    #[must_use]
    pub fn run_with_scope<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ChangeScope<'_>) -> WorkResult + Send + Sync + 'static,
    {
        self.work = ChangeWork::RunWithScope(Arc::new(f));
        self
    }
}

/// A named group of change sets.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    name: String,
    change_sets: Vec<ChangeSet>,
}

impl ChangeLog {
    /// Creates an empty changelog.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            change_sets: Vec::new(),
        }
    }

    /// Adds a change set.
    #[must_use]
    pub fn change_set(mut self, change_set: ChangeSet) -> Self {
        self.change_sets.push(change_set);
        self
    }

    /// Adds a change set in place.
    pub fn push(&mut self, change_set: ChangeSet) {
        self.change_sets.push(change_set);
    }

    /// Name of the changelog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change sets in declaration order, including ignored ones.
    #[must_use]
    pub fn change_sets(&self) -> &[ChangeSet] {
        &self.change_sets
    }

    /// Change sets in execution order.
    ///
    /// Ignored sets are dropped, the rest are sorted by `order` keeping
    /// declaration order for ties.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::DeclarationGroup`] if two change sets share
    /// an id, an id is blank, or a change set has no work.
    pub fn ordered_change_sets(&self) -> Result<Vec<&ChangeSet>> {
        let mut seen = HashSet::new();
        for change_set in &self.change_sets {
            if change_set.id.trim().is_empty() {
                return Err(ChangelogError::declaration_group(
                    &self.name,
                    DeclarationError::BlankId,
                ));
            }
            if !seen.insert(change_set.id.as_str()) {
                return Err(ChangelogError::declaration_group(
                    &self.name,
                    DeclarationError::DuplicateId(change_set.id.clone()),
                ));
            }
        }

        let mut ordered: Vec<&ChangeSet> = self.change_sets.iter().filter(|c| !c.ignore).collect();
        if let Some(empty) = ordered.iter().find(|c| c.work.is_empty()) {
            return Err(ChangelogError::declaration_group(
                &self.name,
                DeclarationError::NoWork(empty.id.clone()),
            ));
        }
        ordered.sort_by_key(|c| c.order);
        Ok(ordered)
    }
}

/// A changelog declared by a type.
pub trait DeclaredChangeLog {
    /// Name of the changelog.
    const NAME: &'static str;

    /// Builds the changelog.
    ///
    /// # Errors
    ///
    /// Any error aborts the run as a declaration-group failure.
    fn build() -> std::result::Result<ChangeLog, BoxError>;
}

type Factory = Box<dyn Fn() -> std::result::Result<ChangeLog, BoxError> + Send + Sync>;

/// Ordered collection of changelog factories.
#[derive(Default)]
pub struct ChangeLogRegistry {
    groups: Vec<(String, Factory)>,
}

impl ChangeLogRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type-declared changelog.
    pub fn register<T: DeclaredChangeLog + 'static>(&mut self) -> &mut Self {
        self.register_fn(T::NAME, T::build)
    }

    /// Registers a changelog factory under `name`.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> std::result::Result<ChangeLog, BoxError> + Send + Sync + 'static,
    {
        self.groups.push((name.into(), Box::new(factory)));
        self
    }

    /// Registers an already built changelog.
    pub fn register_change_log(&mut self, change_log: ChangeLog) -> &mut Self {
        let name = change_log.name().to_string();
        self.register_fn(name, move || Ok(change_log.clone()))
    }

    /// Number of registered changelogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Builds the changelog at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::DeclarationGroup`] if the factory fails or
    /// there is no changelog at `index`.
    pub fn build(&self, index: usize) -> Result<ChangeLog> {
        let (name, factory) = self.groups.get(index).ok_or_else(|| {
            ChangelogError::declaration_group(
                &format!("#{index}"),
                "no changelog registered at this index",
            )
        })?;
        factory().map_err(|source| ChangelogError::DeclarationGroup {
            group: name.clone(),
            source,
        })
    }
}

impl fmt::Debug for ChangeLogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeLogRegistry")
            .field("groups", &self.names())
            .finish()
    }
}

/// JSON form of a changelog whose change sets only declare actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLogDocument {
    /// Changelog name.
    pub name: String,
    /// Change sets.
    #[serde(default)]
    pub change_sets: Vec<ChangeSetDocument>,
}

/// JSON form of one change set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSetDocument {
    /// Change set id.
    pub id: String,
    /// Author.
    pub author: String,
    /// Position within the changelog.
    #[serde(default)]
    pub order: i32,
    /// Re-execute on every run.
    #[serde(default)]
    pub run_always: bool,
    /// Leave out of the run.
    #[serde(default)]
    pub ignore: bool,
    /// Comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Actions to apply.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl ChangeLogDocument {
    /// Parses a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts the document into a changelog.
    #[must_use]
    pub fn into_change_log(self) -> ChangeLog {
        let mut change_log = ChangeLog::new(self.name);
        for doc in self.change_sets {
            let mut change_set = ChangeSet::new(doc.id, doc.author)
                .order(doc.order)
                .actions(doc.actions);
            change_set.run_always = doc.run_always;
            change_set.ignore = doc.ignore;
            change_set.comment = doc.comment;
            change_log.push(change_set);
        }
        change_log
    }
}
