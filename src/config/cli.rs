//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// vultr-builder: Vultr snapshot image builder
///
/// Validates build configurations for a temporary Vultr server that is
/// provisioned and turned into a reusable snapshot.
#[derive(Debug, Parser)]
#[command(name = "vultr-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for vultr-builder
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a configuration file and print the resolved settings
    Validate {
        /// Path to configuration file (`.json` or TOML)
        #[arg(long, short)]
        config: PathBuf,

        /// Region used when the configuration has no `region_id`
        #[arg(long = "region-fallback", value_name = "REGION")]
        region_fallback: Option<String>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "vultr-builder.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }
}
