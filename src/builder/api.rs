//! Cloud API types and client trait.

use std::fmt;

use thiserror::Error;

use crate::config::BuildConfig;

/// Parameters for creating the temporary server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    /// Region id (e.g. `ewr`)
    pub region: String,
    /// Plan id (e.g. `vc2-1c-1gb`)
    pub plan: String,
    /// Operating system id
    pub os_id: i64,
    /// Server label
    pub label: String,
    /// Attach to the private network
    pub enable_private_network: bool,
    /// Assign an IPv6 address
    pub enable_ipv6: bool,
}

impl From<&BuildConfig> for ServerSpec {
    fn from(config: &BuildConfig) -> Self {
        Self {
            region: config.region_id.clone(),
            plan: config.plan_id.clone(),
            os_id: config.os_id,
            label: config.label.clone(),
            enable_private_network: config.enable_private_network,
            enable_ipv6: config.enable_ipv6,
        }
    }
}

/// Lifecycle state of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Being installed
    Pending,
    /// Installed and running
    Active,
    /// Powered off
    Stopped,
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Current view of a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// Server id
    pub id: String,
    /// Lifecycle state
    pub state: ServerState,
    /// Public IPv4 address, once assigned
    pub main_ip: Option<String>,
}

/// Lifecycle state of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// Image is still being taken
    Pending,
    /// Image is usable
    Complete,
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Error type for cloud API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API rejected the request.
    #[error("API returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Network connection failed.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Trait for the cloud operations a build needs.
///
/// # Example
///
/// ```ignore
/// use vultr_builder::builder::{ApiError, CloudApi, ServerInfo, ServerSpec};
///
/// struct Recorder;
///
/// impl CloudApi for Recorder {
///     async fn create_server(&self, _spec: &ServerSpec) -> Result<String, ApiError> {
///         Ok("srv-1".to_string())
///     }
///     // ...
/// }
/// ```
pub trait CloudApi: Send + Sync {
    /// Creates a server and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn create_server(
        &self,
        spec: &ServerSpec,
    ) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;

    /// Fetches the current view of a server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn server(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<ServerInfo, ApiError>> + Send;

    /// Powers a server off.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn halt_server(&self, id: &str)
    -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// Starts a snapshot of a server and returns the snapshot id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn create_snapshot(
        &self,
        server_id: &str,
        description: &str,
    ) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;

    /// Fetches the state of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn snapshot_state(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<SnapshotState, ApiError>> + Send;

    /// Deletes a server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn destroy_server(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}

/// Runs provisioning against an active server.
pub trait Provisioner: Send + Sync {
    /// Provisions `server`, connecting as `ssh_username`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the provisioning steps.
    fn provision(
        &self,
        server: &ServerInfo,
        ssh_username: &str,
    ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}

/// Provisioner that does nothing; the snapshot captures the stock image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProvisioner;

impl Provisioner for NoopProvisioner {
    async fn provision(
        &self,
        server: &ServerInfo,
        _ssh_username: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(server = %server.id, "No provisioning configured");
        Ok(())
    }
}
