//! vultr-builder: Vultr snapshot image builder
//!
//! A library for validating build configurations and turning a temporary
//! Vultr server into a reusable snapshot.

pub mod builder;
pub mod config;
pub mod time;
