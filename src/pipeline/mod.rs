//! Pipeline orchestration for inventory enrichment.
//!
//! Shared load → enrich → write logic used by the CLI and by library callers
//! that start from a file on disk.

mod enrich_stage;
mod load;
mod output;

pub use enrich_stage::{build_enrichers, enrich_inventory, host_capabilities};
pub use load::load_inventory;
pub use output::{OutputTarget, render_inventory, write_output};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or parse the inventory file
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: crate::error::EnrichError,
    },

    /// Configuration was rejected before any work started
    #[error("Invalid configuration: {reason}")]
    ConfigInvalid { reason: String },

    /// Serializing or writing the enriched inventory failed
    #[error("Write failed: {source}")]
    WriteFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Process exit codes.
///
/// Enrichment problems are reported in stats and logs only; they never
/// change the exit code.
pub mod exit_codes {
    /// The inventory was loaded, enriched and written
    pub const SUCCESS: i32 = 0;
    /// An I/O or serialization error occurred
    pub const ERROR: i32 = 1;
    /// The configuration was invalid
    pub const CONFIG_ERROR: i32 = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ERROR, 1);
        assert_eq!(exit_codes::CONFIG_ERROR, 2);
    }

    #[test]
    fn test_pipeline_error_display() {
        let err = PipelineError::ConfigInvalid {
            reason: "depsdev.timeout_secs: Timeout must be at least 1 second".to_string(),
        };
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
