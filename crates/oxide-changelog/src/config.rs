//! Runner configuration.

use std::fmt;
use std::path::Path;

use oxide_action::dialect::DialectKind;
use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, Result};

/// Credentials for the ledger endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// User name.
    #[serde(default)]
    pub user: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Creates credentials for `user` with `password`.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    /// Whether neither user nor password is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .finish()
    }
}

const fn default_enabled() -> bool {
    true
}

/// Configuration of a [`ChangeRunner`](crate::runner::ChangeRunner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// When false, `run` does nothing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Ledger endpoint.
    pub url: String,
    /// Ledger credentials.
    #[serde(default)]
    pub credentials: Credentials,
    /// Target dialect.
    #[serde(default)]
    pub dialect: DialectKind,
    /// Print SQL instead of recording changes.
    #[serde(default)]
    pub dry_run: bool,
}

impl RunnerConfig {
    /// Creates an enabled configuration for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: url.into(),
            credentials: Credentials::default(),
            dialect: DialectKind::default(),
            dry_run: false,
        }
    }

    /// Sets the dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enables or disables the runner.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an IO or serialization error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::Configuration`] for a blank URL.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ChangelogError::Configuration(
                "ledger url is required".to_string(),
            ));
        }
        Ok(())
    }
}
