//! Shared mocks for builder tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::{ApiError, CloudApi, Provisioner, ServerInfo, ServerSpec, ServerState, SnapshotState};
use crate::config::BuildConfig;

pub const SERVER_ID: &str = "srv-1";
pub const SNAPSHOT_ID: &str = "snap-1";

/// Scripted cloud API that records every call.
#[derive(Debug, Default)]
pub struct MockApi {
    /// Pending answers before the server reports active
    pub pending_polls: AtomicUsize,
    /// Pending answers before the snapshot completes
    pub snapshot_polls: AtomicUsize,
    /// Server never leaves pending
    pub server_stuck: bool,
    /// Snapshot never completes
    pub snapshot_stuck: bool,
    /// Name of the call that fails
    pub fail_on: Option<&'static str>,
    pub halted: AtomicBool,
    pub recorded: Mutex<Vec<&'static str>>,
    pub created_spec: Mutex<Option<ServerSpec>>,
    pub snapshot_description: Mutex<Option<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call: &'static str) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn spec(&self) -> Option<ServerSpec> {
        self.created_spec.lock().unwrap().clone()
    }

    pub fn described_as(&self) -> Option<String> {
        self.snapshot_description.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), ApiError> {
        self.recorded.lock().unwrap().push(call);
        if self.fail_on == Some(call) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{call} failed"),
            });
        }
        Ok(())
    }
}

/// Counts down `counter`, returning true while it was still positive.
fn still_pending(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl CloudApi for MockApi {
    async fn create_server(&self, spec: &ServerSpec) -> Result<String, ApiError> {
        self.record("create_server")?;
        *self.created_spec.lock().unwrap() = Some(spec.clone());
        Ok(SERVER_ID.to_string())
    }

    async fn server(&self, id: &str) -> Result<ServerInfo, ApiError> {
        self.record("server")?;
        let state = if self.halted.load(Ordering::SeqCst) {
            ServerState::Stopped
        } else if self.server_stuck || still_pending(&self.pending_polls) {
            ServerState::Pending
        } else {
            ServerState::Active
        };
        Ok(ServerInfo {
            id: id.to_string(),
            state,
            main_ip: Some("192.0.2.10".to_string()),
        })
    }

    async fn halt_server(&self, _id: &str) -> Result<(), ApiError> {
        self.record("halt_server")?;
        self.halted.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_snapshot(&self, _server_id: &str, description: &str) -> Result<String, ApiError> {
        self.record("create_snapshot")?;
        *self.snapshot_description.lock().unwrap() = Some(description.to_string());
        Ok(SNAPSHOT_ID.to_string())
    }

    async fn snapshot_state(&self, _id: &str) -> Result<SnapshotState, ApiError> {
        self.record("snapshot_state")?;
        if self.snapshot_stuck || still_pending(&self.snapshot_polls) {
            Ok(SnapshotState::Pending)
        } else {
            Ok(SnapshotState::Complete)
        }
    }

    async fn destroy_server(&self, _id: &str) -> Result<(), ApiError> {
        self.record("destroy_server")
    }
}

/// Provisioner that records the user it was asked to connect as.
#[derive(Debug, Default)]
pub struct RecordingProvisioner {
    pub fail: bool,
    pub users: Mutex<Vec<String>>,
}

impl Provisioner for RecordingProvisioner {
    async fn provision(
        &self,
        _server: &ServerInfo,
        ssh_username: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.users.lock().unwrap().push(ssh_username.to_string());
        if self.fail {
            return Err("script exited with status 1".into());
        }
        Ok(())
    }
}

pub fn build_config() -> BuildConfig {
    BuildConfig {
        api_key: "test-api-key".to_string(),
        region_id: "ewr".to_string(),
        os_id: 352,
        plan_id: "vc2-1c-1gb".to_string(),
        description: "packer-test-snapshot".to_string(),
        label: "packer-1700000000".to_string(),
        ssh_username: "root".to_string(),
        state_timeout: Duration::from_secs(60),
        enable_private_network: true,
        enable_ipv6: false,
    }
}
