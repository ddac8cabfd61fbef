//! Configuration types for transitive-enrich.

use crate::enrichment::depsdev::{DEFAULT_BASE_URL, DepsDevClientConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over whatever a config file provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// deps.dev resolution settings
    pub depsdev: DepsDevConfig,
    /// Where and how the enriched inventory is written
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// deps.dev Configuration
// ============================================================================

/// Settings for transitive dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DepsDevConfig {
    /// Base URL of the deps.dev API
    pub base_url: String,
    /// Per-request timeout in seconds
    #[schemars(range(min = 1))]
    pub timeout_secs: u64,
    /// Overall deadline for the enrichment pass in seconds (none by default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
    /// Resolve requirements.txt manifests
    pub enable_pypi: bool,
    /// Resolve pom.xml manifests
    pub enable_maven: bool,
    /// Resolve manifests concurrently
    pub parallel: bool,
    /// Run without network access; online enrichers are skipped
    pub offline: bool,
}

impl Default for DepsDevConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            deadline_secs: None,
            enable_pypi: true,
            enable_maven: true,
            parallel: true,
            offline: false,
        }
    }
}

impl DepsDevConfig {
    /// Client settings derived from this config.
    #[must_use]
    pub fn client_config(&self) -> DepsDevClientConfig {
        DepsDevClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Overall pass deadline, if one is configured.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Write single-line JSON instead of pretty-printed
    pub compact: bool,
}
