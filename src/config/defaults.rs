//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default Vultr operating system id, used when `os_id` is absent.
pub const OS_ID: i64 = 387;

/// Default snapshot description template.
pub const SNAPSHOT_DESCRIPTION: &str = "packer-{{timestamp}}";

/// Default temporary server label template.
pub const INSTANCE_LABEL: &str = "packer-{{timestamp}}";

/// Default communicator user.
pub const SSH_USERNAME: &str = "root";

/// Default state timeout in seconds.
pub const STATE_TIMEOUT_SECS: u64 = 600;

/// Region commonly used as the builder-level fallback.
pub const FALLBACK_REGION_ID: &str = "ewr";

/// Default interval between remote state polls, in seconds.
pub const POLL_INTERVAL_SECS: u64 = 5;

/// Default state timeout as Duration.
#[must_use]
pub const fn state_timeout() -> Duration {
    Duration::from_secs(STATE_TIMEOUT_SECS)
}

/// Default poll interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_secs(POLL_INTERVAL_SECS)
}
