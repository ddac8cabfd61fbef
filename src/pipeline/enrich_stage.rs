//! Enrichment stage: build the configured enrichers and run them.

use crate::config::DepsDevConfig;
use crate::enrichment::depsdev::{DepsDevClient, DepsDevEnricher, EcosystemDescriptor};
use crate::enrichment::{
    Capabilities, CancellationToken, EnrichmentStats, InventoryEnricher, NetworkRequirement,
    NoOpEnricher, run_enrichers,
};
use crate::error::Result;
use crate::model::Inventory;
use std::sync::Arc;

/// Build the deps.dev enrichers enabled in `config`.
///
/// PyPI runs before Maven. Both share one client so they also share its
/// resolution cache. With both ecosystems disabled a single
/// [`NoOpEnricher`] stands in.
pub fn build_enrichers(config: &DepsDevConfig) -> Result<Vec<Box<dyn InventoryEnricher>>> {
    let mut descriptors = Vec::new();
    if config.enable_pypi {
        descriptors.push(EcosystemDescriptor::pypi());
    }
    if config.enable_maven {
        descriptors.push(EcosystemDescriptor::maven());
    }
    if descriptors.is_empty() {
        tracing::info!("deps.dev enrichment disabled for all ecosystems");
        return Ok(vec![Box::new(NoOpEnricher::new())]);
    }

    let client = Arc::new(DepsDevClient::new(config.client_config())?);
    Ok(descriptors
        .into_iter()
        .map(|descriptor| {
            Box::new(
                DepsDevEnricher::with_client(descriptor, Arc::clone(&client))
                    .with_parallel(config.parallel),
            ) as Box<dyn InventoryEnricher>
        })
        .collect())
}

/// What the host offers enrichers under `config`.
#[must_use]
pub fn host_capabilities(config: &DepsDevConfig) -> Capabilities {
    Capabilities {
        network: if config.offline {
            NetworkRequirement::Offline
        } else {
            NetworkRequirement::Online
        },
    }
}

/// Run the given enrichers over `inventory` under `config`'s deadline.
///
/// Never fails: per-manifest and per-package problems end up in the
/// returned stats.
pub fn enrich_inventory(
    inventory: &mut Inventory,
    enrichers: &[Box<dyn InventoryEnricher>],
    config: &DepsDevConfig,
) -> Vec<(&'static str, EnrichmentStats)> {
    let cancel = config
        .deadline()
        .map_or_else(CancellationToken::new, CancellationToken::with_timeout);
    let before = inventory.len();

    let results = run_enrichers(enrichers, inventory, &host_capabilities(config), &cancel);

    tracing::info!(
        "Enrichment finished: {} packages ({} added)",
        inventory.len(),
        inventory.len().saturating_sub(before)
    );
    results
}
