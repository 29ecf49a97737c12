//! Error types for changelog execution.

use oxide_action::ActionError;

/// Boxed error raised by user code: changelog factories and change callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while running changelogs.
#[derive(Debug, thiserror::Error)]
pub enum ChangelogError {
    /// Database error from the ledger store.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading configuration or action files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Action resolution failed outside of any single change.
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    /// Invalid runner configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The ledger holds a record it cannot read back.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The ledger store was used before `connect` or after `close`.
    #[error("Ledger store is not connected")]
    NotConnected,

    /// A whole changelog could not be built or is malformed.
    #[error("Cannot load changelog '{group}': {source}")]
    DeclarationGroup {
        /// Changelog name.
        group: String,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },

    /// A single change failed while executing its work.
    #[error("Change '{change_id}' failed: {source}")]
    ChangeExecution {
        /// Id of the failing change set.
        change_id: String,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },
}

impl ChangelogError {
    /// Whether this error aborts the whole run.
    ///
    /// Only failures of a single change's work are recoverable; the runner
    /// records those and moves on to the next change.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::ChangeExecution { .. })
    }

    /// Wraps `source` as the failure of change `change_id`.
    pub fn change_execution(change_id: &str, source: impl Into<BoxError>) -> Self {
        Self::ChangeExecution {
            change_id: change_id.to_string(),
            source: source.into(),
        }
    }

    /// Wraps `source` as the failure of changelog `group`.
    pub fn declaration_group(group: &str, source: impl Into<BoxError>) -> Self {
        Self::DeclarationGroup {
            group: group.to_string(),
            source: source.into(),
        }
    }
}

/// Structural problems found in a changelog before anything runs.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    /// Two change sets share an id.
    #[error("Duplicate change set id '{0}'")]
    DuplicateId(String),

    /// A change set has neither actions nor a callable.
    #[error("Change set '{0}' declares no work")]
    NoWork(String),

    /// A change set id is blank.
    #[error("Change set with blank id")]
    BlankId,
}

/// Result type for changelog operations.
pub type Result<T> = std::result::Result<T, ChangelogError>;
