//! The build pipeline: server up, provision, power off, snapshot, tear down.

use std::time::Duration;

use crate::config::{BuildConfig, defaults};
use crate::time::Sleeper;

use super::{
    Artifact, BuildError, CloudApi, Provisioner, ServerInfo, ServerSpec, ServerState, SnapshotState,
};

/// Runs one build against a cloud API.
///
/// Once the server exists it is destroyed on every exit path. A failed
/// teardown is logged and never replaces the error that ended the build.
#[derive(Debug)]
pub struct BuildSteps<'a, A, P, S> {
    api: &'a A,
    provisioner: &'a P,
    sleeper: &'a S,
    poll_interval: Duration,
}

impl<'a, A: CloudApi, P: Provisioner, S: Sleeper> BuildSteps<'a, A, P, S> {
    /// Creates a pipeline with the default poll interval.
    #[must_use]
    pub const fn new(api: &'a A, provisioner: &'a P, sleeper: &'a S) -> Self {
        Self {
            api,
            provisioner,
            sleeper,
            poll_interval: defaults::poll_interval(),
        }
    }

    /// Sets the interval between state polls.
    ///
    /// Intervals below one millisecond are raised to one millisecond.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Runs the pipeline for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] for the first step that fails.
    pub async fn run(&self, config: &BuildConfig) -> Result<Artifact, BuildError> {
        let spec = ServerSpec::from(config);
        let server_id = self
            .api
            .create_server(&spec)
            .await
            .map_err(|e| BuildError::api("create server", e))?;
        tracing::info!(server = %server_id, region = %spec.region, plan = %spec.plan, "Server created");

        let result = self.snapshot_server(&server_id, config).await;

        match self.api.destroy_server(&server_id).await {
            Ok(()) => tracing::info!(server = %server_id, "Server destroyed"),
            Err(e) => tracing::error!(
                server = %server_id,
                "Failed to destroy server, remove it manually: {e}"
            ),
        }

        result
    }

    async fn snapshot_server(
        &self,
        server_id: &str,
        config: &BuildConfig,
    ) -> Result<Artifact, BuildError> {
        let server = self
            .wait_for_server(server_id, ServerState::Active, config.state_timeout)
            .await?;
        tracing::info!(
            server = %server.id,
            ip = server.main_ip.as_deref().unwrap_or("-"),
            "Server active"
        );

        self.provisioner
            .provision(&server, &config.ssh_username)
            .await
            .map_err(BuildError::Provision)?;

        self.api
            .halt_server(server_id)
            .await
            .map_err(|e| BuildError::api("halt server", e))?;
        self.wait_for_server(server_id, ServerState::Stopped, config.state_timeout)
            .await?;
        tracing::info!(server = %server_id, "Server stopped");

        let snapshot_id = self
            .api
            .create_snapshot(server_id, &config.description)
            .await
            .map_err(|e| BuildError::api("create snapshot", e))?;
        tracing::info!(snapshot = %snapshot_id, "Snapshot started");

        self.wait_for_snapshot(&snapshot_id, config.state_timeout)
            .await?;
        tracing::info!(snapshot = %snapshot_id, "Snapshot complete");

        Ok(Artifact {
            snapshot_id,
            description: config.description.clone(),
            region_id: config.region_id.clone(),
        })
    }

    async fn wait_for_server(
        &self,
        id: &str,
        wanted: ServerState,
        timeout: Duration,
    ) -> Result<ServerInfo, BuildError> {
        let mut waited = Duration::ZERO;
        loop {
            let server = self
                .api
                .server(id)
                .await
                .map_err(|e| BuildError::api("fetch server", e))?;
            if server.state == wanted {
                return Ok(server);
            }
            tracing::debug!(server = %id, state = %server.state, want = %wanted, "Waiting");
            waited = self.pause(waited, timeout).await.ok_or_else(|| BuildError::StateTimeout {
                resource: "server",
                id: id.to_string(),
                wanted: wanted.to_string(),
                timeout,
            })?;
        }
    }

    async fn wait_for_snapshot(&self, id: &str, timeout: Duration) -> Result<(), BuildError> {
        let mut waited = Duration::ZERO;
        loop {
            let state = self
                .api
                .snapshot_state(id)
                .await
                .map_err(|e| BuildError::api("fetch snapshot", e))?;
            if state == SnapshotState::Complete {
                return Ok(());
            }
            tracing::debug!(snapshot = %id, state = %state, "Waiting");
            waited = self.pause(waited, timeout).await.ok_or_else(|| BuildError::StateTimeout {
                resource: "snapshot",
                id: id.to_string(),
                wanted: SnapshotState::Complete.to_string(),
                timeout,
            })?;
        }
    }

    /// Sleeps one poll interval and returns the new total wait, or `None`
    /// once `timeout` is spent.
    async fn pause(&self, waited: Duration, timeout: Duration) -> Option<Duration> {
        if waited >= timeout {
            return None;
        }
        let step = self.poll_interval.min(timeout - waited);
        self.sleeper.sleep(step).await;
        Some(waited + step)
    }
}
