//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::cli::{Cli, Command};

fn cli(args: &[&str]) -> Result<Cli, clap::Error> {
    let mut full_args = vec!["vultr-builder"];
    full_args.extend(args);
    Cli::try_parse_from_iter(full_args)
}

#[test]
fn validate_requires_config() {
    assert!(cli(&["validate"]).is_err());
}

#[test]
fn validate_with_config() {
    let cli = cli(&["validate", "--config", "build.toml"]).unwrap();

    match cli.command {
        Command::Validate {
            config,
            region_fallback,
        } => {
            assert_eq!(config, PathBuf::from("build.toml"));
            assert_eq!(region_fallback, None);
        }
        Command::Init { .. } => panic!("expected validate"),
    }
    assert!(!cli.verbose);
}

#[test]
fn validate_with_region_fallback() {
    let cli = cli(&["validate", "-c", "build.json", "--region-fallback", "ewr"]).unwrap();

    assert!(matches!(
        cli.command,
        Command::Validate { region_fallback: Some(ref r), .. } if r == "ewr"
    ));
}

#[test]
fn verbose_is_global() {
    let cli = cli(&["validate", "-c", "build.toml", "-v"]).unwrap();

    assert!(cli.verbose);
}

#[test]
fn init_default_output() {
    let cli = cli(&["init"]).unwrap();

    assert!(matches!(
        cli.command,
        Command::Init { ref output } if output == &PathBuf::from("vultr-builder.toml")
    ));
}

#[test]
fn init_custom_output() {
    let cli = cli(&["init", "--output", "custom.toml"]).unwrap();

    assert!(matches!(
        cli.command,
        Command::Init { ref output } if output == &PathBuf::from("custom.toml")
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(cli(&[]).is_err());
}
