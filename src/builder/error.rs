//! Error types for build execution.

use std::time::Duration;

use thiserror::Error;

use super::ApiError;

/// Error type for a build run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// `run` was called before a successful `prepare`.
    #[error("Builder has no prepared configuration")]
    NotPrepared,

    /// A cloud API call failed.
    #[error("Failed to {step}: {source}")]
    Api {
        /// What the build was doing
        step: &'static str,
        /// Underlying API error
        #[source]
        source: ApiError,
    },

    /// A resource did not reach the wanted state in time.
    #[error("Timed out after {}s waiting for {resource} '{id}' to become {wanted}", timeout.as_secs())]
    StateTimeout {
        /// Kind of resource (server or snapshot)
        resource: &'static str,
        /// Resource id
        id: String,
        /// State that was awaited
        wanted: String,
        /// Configured state timeout
        timeout: Duration,
    },

    /// Provisioning failed.
    #[error("Provisioning failed: {0}")]
    Provision(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BuildError {
    /// Wraps an API error with the step it happened in.
    #[must_use]
    pub fn api(step: &'static str, source: ApiError) -> Self {
        Self::Api { step, source }
    }
}
