//! Configuration module for transitive-enrich.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.transitive-enrich.yaml` file in your project root or
//! `~/.config/transitive-enrich/`:
//!
//! ```yaml
//! depsdev:
//!   base_url: https://api.deps.dev
//!   timeout_secs: 30
//!   enable_maven: false
//! output:
//!   compact: true
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{AppConfig, DepsDevConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, load_config_file,
    load_or_default,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete config files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
