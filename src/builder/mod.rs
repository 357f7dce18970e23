//! Builder layer: prepare a configuration, then turn a server into a snapshot.
//!
//! This module provides:
//! - The [`Builder`] trait and its Vultr implementation ([`VultrBuilder`])
//! - The cloud API seam ([`CloudApi`]) and provisioning hook ([`Provisioner`])
//! - The build pipeline ([`BuildSteps`])
//!
//! No HTTP client lives here; hosts supply a [`CloudApi`] implementation.

mod api;
mod error;
mod steps;

#[cfg(test)]
mod test_fixtures;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use api::{
    ApiError, CloudApi, NoopProvisioner, Provisioner, ServerInfo, ServerSpec, ServerState,
    SnapshotState,
};
pub use error::BuildError;
pub use steps::BuildSteps;

use crate::config::{BuildConfig, ConfigErrors, PrepareContext, RawConfig, defaults};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Id of the created snapshot
    pub snapshot_id: String,
    /// Snapshot description
    pub description: String,
    /// Region the snapshot was taken in
    pub region_id: String,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A snapshot was created: '{}' (ID: {}) in region '{}'",
            self.description, self.snapshot_id, self.region_id
        )
    }
}

/// A builder that validates its configuration before running.
pub trait Builder: Send + Sync {
    /// Validates `raw` and keeps the result for [`Builder::run`].
    ///
    /// Returns advisory warnings on success.
    ///
    /// # Errors
    ///
    /// Returns every configuration problem found. A failed call leaves the
    /// builder unprepared.
    fn prepare(&mut self, raw: &RawConfig) -> Result<Vec<String>, ConfigErrors>;

    /// Runs the build with the prepared configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotPrepared`] without a successful `prepare`,
    /// or the error of the failing build step.
    fn run<A: CloudApi, P: Provisioner>(
        &self,
        api: &A,
        provisioner: &P,
    ) -> impl std::future::Future<Output = Result<Artifact, BuildError>> + Send;
}

/// Builds Vultr snapshots.
///
/// # Type Parameters
///
/// - `S`: The sleeper used between state polls (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use vultr_builder::builder::{Builder, VultrBuilder};
///
/// let raw = json!({
///     "api_key": "key",
///     "region_id": "ewr",
///     "plan_id": "vc2-1c-1gb",
/// });
///
/// let mut builder = VultrBuilder::new();
/// let warnings = builder.prepare(raw.as_object().unwrap()).unwrap();
/// assert!(warnings.is_empty());
/// assert_eq!(builder.config().unwrap().region_id, "ewr");
/// ```
pub struct VultrBuilder<S = TokioSleeper> {
    clock: Arc<dyn Clock>,
    sleeper: S,
    region_fallback: Option<String>,
    poll_interval: Duration,
    config: Option<BuildConfig>,
}

impl<S: fmt::Debug> fmt::Debug for VultrBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VultrBuilder")
            .field("sleeper", &self.sleeper)
            .field("region_fallback", &self.region_fallback)
            .field("poll_interval", &self.poll_interval)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for VultrBuilder<TokioSleeper> {
    fn default() -> Self {
        Self::new()
    }
}

impl VultrBuilder<TokioSleeper> {
    /// Creates a builder with the system clock and no region fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            sleeper: TokioSleeper,
            region_fallback: None,
            poll_interval: defaults::poll_interval(),
            config: None,
        }
    }
}

impl<S> VultrBuilder<S> {
    /// Sets a custom sleeper for state polling.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> VultrBuilder<S2> {
        VultrBuilder {
            clock: self.clock,
            sleeper,
            region_fallback: self.region_fallback,
            poll_interval: self.poll_interval,
            config: self.config,
        }
    }

    /// Sets the clock used for `{{timestamp}}`.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sets the region used when the configuration has no `region_id`.
    #[must_use]
    pub fn with_region_fallback(mut self, region: impl Into<String>) -> Self {
        self.region_fallback = Some(region.into());
        self
    }

    /// Sets the interval between state polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the prepared configuration, if `prepare` succeeded.
    #[must_use]
    pub const fn config(&self) -> Option<&BuildConfig> {
        self.config.as_ref()
    }
}

impl<S: Sleeper> Builder for VultrBuilder<S> {
    fn prepare(&mut self, raw: &RawConfig) -> Result<Vec<String>, ConfigErrors> {
        self.config = None;

        let ctx = PrepareContext {
            clock: self.clock.as_ref(),
            region_fallback: self.region_fallback.as_deref(),
        };
        let prepared = BuildConfig::prepare(raw, ctx)?;

        self.config = Some(prepared.config);
        Ok(prepared.warnings)
    }

    async fn run<A: CloudApi, P: Provisioner>(
        &self,
        api: &A,
        provisioner: &P,
    ) -> Result<Artifact, BuildError> {
        let config = self.config.as_ref().ok_or(BuildError::NotPrepared)?;
        tracing::info!("{config}");

        BuildSteps::new(api, provisioner, &self.sleeper)
            .with_poll_interval(self.poll_interval)
            .run(config)
            .await
    }
}
