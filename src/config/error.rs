//! Error types for configuration decoding and validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single configuration problem.
///
/// `prepare` collects these into [`ConfigErrors`] instead of stopping at
/// the first one, so a user sees every typo in one run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to parse a JSON configuration file.
    #[error("Failed to parse JSON config: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The configuration document is not a key/value table.
    #[error("Config document must be a table of keys, found {found}")]
    NotATable {
        /// Kind of value found at the top level
        found: &'static str,
    },

    /// A value does not have the type its key requires.
    #[error("'{key}' expected type '{expected}', got '{found}'")]
    Decode {
        /// Key whose value is mistyped
        key: String,
        /// Type required by the key
        expected: &'static str,
        /// Kind of value supplied
        found: &'static str,
    },

    /// The configuration contains a key outside the schema.
    #[error("unknown configuration key: '{key}'")]
    UnknownKey {
        /// The unrecognized key
        key: String,
    },

    /// Missing required field.
    #[error("{field} is required")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
    },

    /// Invalid duration value.
    #[error("Failed parsing {field} '{value}': {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// The value as supplied
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Template expansion failed (unknown token or bad syntax).
    #[error("Error processing {field} template: {reason}")]
    InvalidTemplate {
        /// Name of the templated field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` and template errors.
///
/// These match the external configuration keys.
pub mod field {
    /// The Vultr API key.
    pub const API_KEY: &str = "api_key";
    /// The region the server is created in.
    pub const REGION_ID: &str = "region_id";
    /// The operating system image of the server.
    pub const OS_ID: &str = "os_id";
    /// The server plan.
    pub const PLAN_ID: &str = "plan_id";
    /// Description attached to the snapshot.
    pub const SNAPSHOT_DESCRIPTION: &str = "snapshot_description";
    /// Label of the temporary server.
    pub const INSTANCE_LABEL: &str = "instance_label";
    /// User the communicator connects as.
    pub const SSH_USERNAME: &str = "ssh_username";
    /// Maximum wait for a remote state change.
    pub const STATE_TIMEOUT: &str = "state_timeout";
    /// Private networking toggle.
    pub const ENABLE_PRIVATE_NETWORK: &str = "enable_private_network";
    /// IPv6 toggle.
    pub const ENABLE_IPV6: &str = "enable_ipv6";

    /// Every key accepted in a raw configuration.
    pub const ALL: [&str; 10] = [
        API_KEY,
        SNAPSHOT_DESCRIPTION,
        REGION_ID,
        OS_ID,
        PLAN_ID,
        SSH_USERNAME,
        STATE_TIMEOUT,
        ENABLE_PRIVATE_NETWORK,
        ENABLE_IPV6,
        INSTANCE_LABEL,
    ];
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str) -> Self {
        Self::MissingRequired { field }
    }
}

/// Every problem found while preparing a configuration.
///
/// Never empty when returned as an error.
#[derive(Debug)]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    /// Returns the individual errors in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no errors.
    ///
    /// A `ConfigErrors` returned by `prepare` always holds at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any error matches the predicate.
    pub fn any(&self, predicate: impl Fn(&ConfigError) -> bool) -> bool {
        self.0.iter().any(predicate)
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.0.as_slice() {
            return write!(f, "1 error occurred:\n\t* {only}");
        }

        write!(f, "{} errors occurred:", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n\t* {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Accumulates errors during a single `prepare` pass.
#[derive(Debug, Default)]
pub(crate) struct ErrorSink(Vec<ConfigError>);

impl ErrorSink {
    pub(crate) fn push(&mut self, error: ConfigError) {
        self.0.push(error);
    }

    /// Records the error of `result` and returns its value, if any.
    pub(crate) fn take<T>(&mut self, result: Result<T, ConfigError>) -> Option<T> {
        result.map_err(|e| self.push(e)).ok()
    }

    /// Converts the sink into `Ok(value)` when no errors were recorded.
    ///
    /// `value` is dropped otherwise, so placeholders filled in after a
    /// failed field never reach the caller.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, ConfigErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ConfigErrors(self.0))
        }
    }
}
