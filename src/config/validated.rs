//! Validated build configuration.
//!
//! [`BuildConfig::prepare`] turns a [`RawConfig`] into a [`BuildConfig`] in
//! one pass: decode every key, reject unknown keys, fill defaults, expand
//! templates, then check required fields. Every problem found along the way
//! is reported together.

use std::fmt;
use std::time::Duration;

use crate::time::{Clock, SystemClock};

use super::decode;
use super::defaults;
use super::error::{ConfigError, ConfigErrors, ErrorSink, field};
use super::raw::RawConfig;
use super::template::{TemplateContext, TemplateExpander};

/// Fully validated configuration for one build.
///
/// Only obtainable through [`BuildConfig::prepare`], so holding one means
/// every required field is present and every template has been expanded.
#[derive(Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Vultr API key
    pub api_key: String,

    /// Region the temporary server is created in
    pub region_id: String,

    /// Operating system id of the temporary server
    pub os_id: i64,

    /// Server plan
    pub plan_id: String,

    /// Snapshot description, templates expanded
    pub description: String,

    /// Temporary server label, templates expanded
    pub label: String,

    /// User the provisioner connects as
    pub ssh_username: String,

    /// Maximum wait for a remote state change
    pub state_timeout: Duration,

    /// Attach the server to the private network
    pub enable_private_network: bool,

    /// Assign an IPv6 address to the server
    pub enable_ipv6: bool,
}

/// Result of a successful [`BuildConfig::prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    /// The validated configuration
    pub config: BuildConfig,

    /// Advisory notices; validation failures are never reported here
    pub warnings: Vec<String>,
}

/// Inputs to `prepare` that do not come from the raw configuration.
#[derive(Clone, Copy)]
pub struct PrepareContext<'a> {
    /// Time source for `{{timestamp}}`
    pub clock: &'a dyn Clock,

    /// Region used when the raw configuration has none
    pub region_fallback: Option<&'a str>,
}

impl Default for PrepareContext<'_> {
    fn default() -> Self {
        Self {
            clock: &SystemClock,
            region_fallback: None,
        }
    }
}

impl fmt::Debug for PrepareContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrepareContext")
            .field("region_fallback", &self.region_fallback)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("api_key", &"<redacted>")
            .field("region_id", &self.region_id)
            .field("os_id", &self.os_id)
            .field("plan_id", &self.plan_id)
            .field("description", &self.description)
            .field("label", &self.label)
            .field("ssh_username", &self.ssh_username)
            .field("state_timeout", &self.state_timeout)
            .field("enable_private_network", &self.enable_private_network)
            .field("enable_ipv6", &self.enable_ipv6)
            .finish()
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ region: {}, plan: {}, os: {}, label: {}, description: {}, \
             ssh_username: {}, state_timeout: {}, private_network: {}, ipv6: {} }}",
            self.region_id,
            self.plan_id,
            self.os_id,
            self.label,
            self.description,
            self.ssh_username,
            humantime::format_duration(self.state_timeout),
            self.enable_private_network,
            self.enable_ipv6,
        )
    }
}

impl BuildConfig {
    /// Prepares a configuration using the system clock and no region fallback.
    ///
    /// # Errors
    ///
    /// See [`BuildConfig::prepare`].
    pub fn from_raw(raw: &RawConfig) -> Result<Prepared, ConfigErrors> {
        Self::prepare(raw, PrepareContext::default())
    }

    /// Decodes, defaults, expands and validates a raw configuration.
    ///
    /// # Errors
    ///
    /// Returns every problem found:
    /// - a value of the wrong type ([`ConfigError::Decode`])
    /// - a key outside the schema ([`ConfigError::UnknownKey`])
    /// - `api_key`, `plan_id` or a resolvable `region_id` missing
    ///   ([`ConfigError::MissingRequired`])
    /// - `state_timeout` unparseable ([`ConfigError::InvalidDuration`])
    /// - a bad template in `snapshot_description` or `instance_label`
    ///   ([`ConfigError::InvalidTemplate`])
    pub fn prepare(raw: &RawConfig, ctx: PrepareContext<'_>) -> Result<Prepared, ConfigErrors> {
        let mut sink = ErrorSink::default();

        let api_key = sink.take(decode::string(raw, field::API_KEY));
        let region_id = sink.take(decode::string(raw, field::REGION_ID));
        // Zero is not an image id; treat it like an unset key.
        let os_id = sink
            .take(decode::integer(raw, field::OS_ID))
            .flatten()
            .filter(|id| *id != 0);
        let plan_id = sink.take(decode::string(raw, field::PLAN_ID));
        let description = sink.take(decode::string(raw, field::SNAPSHOT_DESCRIPTION));
        let label = sink.take(decode::string(raw, field::INSTANCE_LABEL));
        let ssh_username = sink
            .take(decode::string(raw, field::SSH_USERNAME))
            .flatten();
        let state_timeout = sink
            .take(decode::string(raw, field::STATE_TIMEOUT))
            .flatten();
        let enable_private_network = sink
            .take(decode::boolean(raw, field::ENABLE_PRIVATE_NETWORK))
            .flatten();
        let enable_ipv6 = sink.take(decode::boolean(raw, field::ENABLE_IPV6)).flatten();

        for error in decode::unknown_keys(raw) {
            sink.push(error);
        }

        // Keys that failed to decode already carry an error; skip their later checks.
        let expander = TemplateExpander::new(TemplateContext::capture(ctx.clock));
        let description = description.map_or_else(String::new, |d| {
            let template = non_empty(d.as_deref()).unwrap_or(defaults::SNAPSHOT_DESCRIPTION);
            sink.take(expander.expand(field::SNAPSHOT_DESCRIPTION, template))
                .unwrap_or_default()
        });
        let label = label.map_or_else(String::new, |l| {
            let template = non_empty(l.as_deref()).unwrap_or(defaults::INSTANCE_LABEL);
            sink.take(expander.expand(field::INSTANCE_LABEL, template))
                .unwrap_or_default()
        });

        let api_key = api_key.map_or_else(String::new, |v| {
            sink.take(required(field::API_KEY, v)).unwrap_or_default()
        });
        let plan_id = plan_id.map_or_else(String::new, |v| {
            sink.take(required(field::PLAN_ID, v)).unwrap_or_default()
        });
        let region_id = region_id.map_or_else(String::new, |v| {
            let resolved = v.or_else(|| ctx.region_fallback.map(str::to_string));
            sink.take(required(field::REGION_ID, resolved))
                .unwrap_or_default()
        });

        let state_timeout = match state_timeout {
            Some(value) => sink
                .take(parse_state_timeout(&value))
                .unwrap_or_else(defaults::state_timeout),
            None => defaults::state_timeout(),
        };

        let config = Self {
            api_key,
            region_id,
            os_id: os_id.unwrap_or(defaults::OS_ID),
            plan_id,
            description,
            label,
            ssh_username: ssh_username
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| defaults::SSH_USERNAME.to_string()),
            state_timeout,
            enable_private_network: enable_private_network.unwrap_or(false),
            enable_ipv6: enable_ipv6.unwrap_or(false),
        };

        let prepared = sink.finish(Prepared {
            config,
            warnings: Vec::new(),
        });
        match &prepared {
            Ok(p) => tracing::debug!(
                region = %p.config.region_id,
                plan = %p.config.plan_id,
                "Prepared build config"
            ),
            Err(errors) => tracing::debug!(count = errors.len(), "Build config rejected"),
        }
        prepared
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Fails with `MissingRequired` unless `value` is present and non-empty.
fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::missing(name))
}

fn parse_state_timeout(value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidDuration {
        field: field::STATE_TIMEOUT,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
