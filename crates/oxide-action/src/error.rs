//! Error types for action resolution and SQL generation.

use crate::action::ActionKind;
use crate::validation::ValidationErrors;

/// Errors that can occur while resolving and executing actions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The action failed validation; no SQL was generated for it.
    #[error("Validation failed for {action}: {errors}")]
    Validation {
        /// Kind of the rejected action.
        action: ActionKind,
        /// Every error found, in check order.
        errors: ValidationErrors,
    },

    /// Generation failed on input validation could not catch.
    #[error("Cannot execute {action}: {message}")]
    Execution {
        /// Kind of the failing action.
        action: ActionKind,
        /// What went wrong.
        message: String,
    },

    /// No logic, or more than one equally specific logic, applies.
    #[error("Cannot resolve logic for {action} on {dialect}: {message}")]
    ResolutionConflict {
        /// Kind of the action being resolved.
        action: ActionKind,
        /// Dialect short name.
        dialect: String,
        /// Why resolution failed.
        message: String,
    },

    /// Delegation nested deeper than the resolver allows.
    #[error("Delegation depth {depth} exceeded while executing {action}")]
    DelegationDepthExceeded {
        /// Kind of the action at the limit.
        action: ActionKind,
        /// The depth limit.
        depth: usize,
    },
}

impl ActionError {
    /// Generation-time failure for `action`.
    pub fn execution(action: ActionKind, message: impl Into<String>) -> Self {
        Self::Execution {
            action,
            message: message.into(),
        }
    }

    /// Returns the validation errors, if this is a validation failure.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Whether this error comes from logic registration rather than input.
    #[must_use]
    pub const fn is_resolution_conflict(&self) -> bool {
        matches!(self, Self::ResolutionConflict { .. })
    }
}

/// Result type for action operations.
pub type Result<T> = std::result::Result<T, ActionError>;
