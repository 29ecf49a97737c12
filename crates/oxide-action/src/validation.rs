//! Validation results for actions.
//!
//! Every [`ActionLogic`](crate::logic::ActionLogic) validates an action before
//! it is executed. Checks are chained and append errors in call order; any
//! error prevents SQL generation for that action.

use std::fmt;

use crate::clauses::StringClauses;
use crate::name::ObjectName;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required attribute is absent or blank.
    MissingField {
        /// Name of the attribute, including its nesting path.
        field: String,
    },
    /// The requested feature is not supported by the target dialect.
    UnsupportedOperation {
        /// Human readable name of the feature.
        operation: String,
        /// Dialect short name.
        dialect: String,
    },
    /// Any other invalid input.
    Invalid(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} is required"),
            Self::UnsupportedOperation { operation, dialect } => {
                write!(f, "{operation} is not supported on {dialect}")
            }
            Self::Invalid(message) => f.write_str(message),
        }
    }
}

/// Attribute values that can be checked for presence.
pub trait Required {
    /// Returns true if the value counts as absent.
    fn is_missing(&self) -> bool;
}

impl Required for str {
    fn is_missing(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Required for String {
    fn is_missing(&self) -> bool {
        self.as_str().is_missing()
    }
}

impl Required for ObjectName {
    fn is_missing(&self) -> bool {
        self.is_blank()
    }
}

impl Required for StringClauses {
    fn is_missing(&self) -> bool {
        self.render().is_empty()
    }
}

impl<T: Required> Required for Option<T> {
    fn is_missing(&self) -> bool {
        self.as_ref().is_none_or(Required::is_missing)
    }
}

impl<T> Required for Vec<T> {
    fn is_missing(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Required + ?Sized> Required for &T {
    fn is_missing(&self) -> bool {
        (**self).is_missing()
    }
}

/// Accumulated validation errors, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records a missing-field error if `value` is absent.
    pub fn check_required<T: Required + ?Sized>(&mut self, field: &str, value: &T) -> &mut Self {
        if value.is_missing() {
            self.errors.push(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
        self
    }

    /// Records that `operation` is unsupported on `dialect`.
    pub fn add_unsupported(
        &mut self,
        operation: impl Into<String>,
        dialect: impl Into<String>,
    ) -> &mut Self {
        self.errors.push(ValidationError::UnsupportedOperation {
            operation: operation.into(),
            dialect: dialect.into(),
        });
        self
    }

    /// Records a free-form error.
    pub fn add_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.errors.push(ValidationError::Invalid(message.into()));
        self
    }

    /// Appends all errors from `other`.
    pub fn extend(&mut self, other: Self) -> &mut Self {
        self.errors.extend(other.errors);
        self
    }

    /// Returns true iff at least one error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the recorded errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the error messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Returns true if a missing-field error names `field`.
    #[must_use]
    pub fn is_missing(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingField { field: f } if f == field))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
