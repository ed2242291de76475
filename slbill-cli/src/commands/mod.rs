//! CLI command implementations.

pub mod billing;
pub mod config;
