//! Configuration validation for transitive-enrich.

use super::types::{AppConfig, DepsDevConfig, OutputConfig};
use reqwest::Url;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.depsdev.validate();
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for DepsDevConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        match Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ConfigError {
                field: "depsdev.base_url".to_string(),
                message: format!("Unsupported scheme '{}', expected http or https", url.scheme()),
            }),
            Err(e) => errors.push(ConfigError {
                field: "depsdev.base_url".to_string(),
                message: format!("Invalid URL '{}': {}", self.base_url, e),
            }),
        }

        if self.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "depsdev.timeout_secs".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.deadline_secs == Some(0) {
            errors.push(ConfigError {
                field: "depsdev.deadline_secs".to_string(),
                message: "Deadline must be at least 1 second".to_string(),
            });
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file
            && let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError {
                field: "output.file".to_string(),
                message: format!("Parent directory does not exist: {}", parent.display()),
            });
        }

        errors
    }
}
