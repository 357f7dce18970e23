//! vultr-builder: Vultr snapshot image builder
//!
//! Entry point for the vultr-builder CLI.

use std::path::Path;
use std::process::ExitCode;

use vultr_builder::builder::{Builder, VultrBuilder};
use vultr_builder::config::{Cli, Command, raw, write_default_config};

mod app;

use app::{exit_code, print_config_errors, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    match &cli.command {
        Command::Init { output } => handle_init(output),
        Command::Validate {
            config,
            region_fallback,
        } => handle_validate(config, region_fallback.as_deref()),
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `validate` subcommand.
fn handle_validate(path: &Path, region_fallback: Option<&str>) -> ExitCode {
    let raw = match raw::load(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };

    let mut builder = VultrBuilder::new();
    if let Some(region) = region_fallback {
        builder = builder.with_region_fallback(region);
    }

    match builder.prepare(&raw) {
        Ok(warnings) => {
            for warning in &warnings {
                tracing::warn!("{warning}");
            }
            if let Some(config) = builder.config() {
                println!("{config}");
            }
            exit_code::SUCCESS
        }
        Err(errors) => {
            print_config_errors(&errors);
            exit_code::CONFIG_ERROR
        }
    }
}
