//! Configuration module.
//!
//! Handles loading TOML configuration, merging CLI overrides and
//! validating the result.

pub mod loader;

pub use loader::{validate_config, AccountConfig, Config, OptionsConfig};
