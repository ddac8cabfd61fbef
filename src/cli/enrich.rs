//! Enrich command handler.
//!
//! Implements the `enrich` subcommand: load an inventory, add transitive
//! dependencies for its manifests, and write the result.

use crate::config::{AppConfig, Validatable};
use crate::pipeline::{
    OutputTarget, PipelineError, build_enrichers, enrich_inventory, exit_codes, load_inventory,
    render_inventory, write_output,
};
use anyhow::Result;
use std::path::Path;

/// Run the enrich command
///
/// Returns the process exit code. Enrichment failures are logged but never
/// affect it.
pub fn run_enrich(inventory_path: &Path, config: &AppConfig, quiet: bool) -> Result<i32> {
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{}", error);
        }
        let reason = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        tracing::error!("{}", PipelineError::ConfigInvalid { reason });
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let mut inventory =
        load_inventory(inventory_path, quiet).map_err(|source| PipelineError::LoadFailed {
            path: inventory_path.display().to_string(),
            source,
        })?;

    let enrichers = build_enrichers(&config.depsdev)?;
    let results = enrich_inventory(&mut inventory, &enrichers, &config.depsdev);
    if !quiet {
        for (name, stats) in &results {
            if stats.has_errors() {
                tracing::warn!("{} finished with {} error(s)", name, stats.errors.len());
            }
        }
    }

    let content = render_inventory(&inventory, config.output.compact)
        .map_err(|source| PipelineError::WriteFailed { source })?;
    let target = OutputTarget::from_option(config.output.file.clone());
    write_output(&content, &target, quiet).map_err(|source| PipelineError::WriteFailed { source })?;

    Ok(exit_codes::SUCCESS)
}
