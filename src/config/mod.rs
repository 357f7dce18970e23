//! Configuration layer for vultr-builder.
//!
//! This module provides:
//! - Raw, untyped configuration ([`RawConfig`]) loaded from TOML or JSON
//! - Per-key type-checked decoding ([`decode`])
//! - `{{timestamp}}` expansion ([`TemplateExpander`])
//! - Validated configuration ([`BuildConfig`], [`BuildConfig::prepare`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - Default values ([`defaults`])
//!
//! # Schema
//!
//! The schema is closed: a key outside [`field::ALL`] is an error, not a
//! warning, so typos surface before any server is created.
//!
//! # Errors
//!
//! `prepare` never stops at the first problem. All decode, schema,
//! template and required-field errors are collected into one
//! [`ConfigErrors`]. The warnings channel of [`Prepared`] is reserved for
//! advisory notices and is never used for failures.
//!
//! # Region Fallback
//!
//! `region_id` has no built-in default. A caller may pass a fallback
//! through [`PrepareContext::region_fallback`]; without one, a missing
//! region is a required-field error.

mod cli;
pub mod decode;
pub mod defaults;
mod error;
pub mod raw;
mod template;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod decode_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, ConfigErrors, field};
pub use raw::{RawConfig, RawFormat, default_config_template, write_default_config};
pub use template::{TemplateContext, TemplateExpander};
pub use validated::{BuildConfig, PrepareContext, Prepared};
