//! Raw, untyped configuration as supplied by the user.
//!
//! A [`RawConfig`] is read from a TOML or JSON file (or built directly by
//! a host) and handed to [`BuildConfig::prepare`] unchanged.
//!
//! [`BuildConfig::prepare`]: super::BuildConfig::prepare

use std::path::Path;

use serde_json::Value;

use super::ConfigError;
use super::decode::kind;

/// Untyped key/value configuration prior to validation.
pub type RawConfig = serde_json::Map<String, Value>;

/// Source format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    /// TOML document with top-level keys.
    Toml,
    /// JSON object.
    Json,
}

impl RawFormat {
    /// Picks the format from the file extension: `.json` is JSON, anything
    /// else is TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Loads a raw configuration from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its top
/// level is not a table.
pub fn load(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw = parse(&content, RawFormat::from_path(path))?;
    tracing::debug!(path = %path.display(), keys = raw.len(), "Loaded raw config");
    Ok(raw)
}

/// Parses a raw configuration from a string.
///
/// # Errors
///
/// Returns an error if the content is invalid for `format` or its top
/// level is not a table.
pub fn parse(content: &str, format: RawFormat) -> Result<RawConfig, ConfigError> {
    let value: Value = match format {
        RawFormat::Toml => toml::from_str(content)?,
        RawFormat::Json => serde_json::from_str(content)?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::NotATable {
            found: kind(&other),
        }),
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# vultr-builder configuration
#
# Unknown keys are rejected, so a typo fails before any server is created.

# Vultr API key (required)
api_key = "YOUR_API_KEY"

# Region the temporary server is created in (required unless a
# fallback is passed with --region-fallback)
region_id = "ewr"

# Server plan (required)
plan_id = "vc2-1c-1gb"

# Operating system id (default: 387)
# os_id = 387

# User the provisioner connects as (default: root)
# ssh_username = "root"

# Snapshot description and server label. {{timestamp}} expands to the
# current Unix time. (default: packer-{{timestamp}})
# snapshot_description = "packer-{{timestamp}}"
# instance_label = "packer-{{timestamp}}"

# Maximum wait for the server or snapshot to change state (default: 10m)
# state_timeout = "10m"

# Networking (default: false)
# enable_private_network = false
# enable_ipv6 = false
"#
    .to_string()
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, default_config_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
