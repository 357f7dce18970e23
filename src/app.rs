//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use vultr_builder::config::{ConfigError, ConfigErrors};

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - unreadable file, invalid keys, missing fields, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;
}

/// Prints configuration errors followed by hints for common mistakes.
pub fn print_config_errors(errors: &ConfigErrors) {
    eprintln!("Configuration error: {errors}");

    if errors.any(|e| matches!(e, ConfigError::UnknownKey { .. })) {
        eprintln!("\nRun 'vultr-builder init' to see every accepted key.");
    }
    if errors.any(|e| matches!(e, ConfigError::MissingRequired { field: "region_id" })) {
        eprintln!("\nSet region_id or pass --region-fallback.");
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
