//! Enrichment traits for extensibility.
//!
//! This module provides the `InventoryEnricher` trait for enrichers that
//! mutate a package inventory in place, along with the capability
//! declarations a host uses to schedule them.

use crate::enrichment::{CancellationToken, EnrichmentError, EnrichmentStats};
use crate::model::Inventory;

/// Network access an enricher needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkRequirement {
    /// Works without network access
    #[default]
    Offline,
    /// Requires outbound network access
    Online,
}

/// Capabilities an enricher requires from its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub network: NetworkRequirement,
}

impl Capabilities {
    /// Whether the host described by `available` can run an enricher needing `self`.
    #[must_use]
    pub fn satisfied_by(&self, available: &Self) -> bool {
        match self.network {
            NetworkRequirement::Offline => true,
            NetworkRequirement::Online => available.network == NetworkRequirement::Online,
        }
    }
}

/// Trait for inventory enrichers.
///
/// `enrich` is best-effort: it never fails, and reports problems through
/// logging and the returned [`EnrichmentStats`].
pub trait InventoryEnricher: Send + Sync {
    /// Unique name, also used as the provenance tag on touched packages.
    fn name(&self) -> &'static str;

    /// Version of this enricher's behaviour.
    fn version(&self) -> u32;

    /// What the host must provide.
    fn requirements(&self) -> Capabilities;

    /// Producers that must run before this enricher.
    fn required_plugins(&self) -> Vec<&'static str>;

    /// Enrich the inventory in place.
    fn enrich(&self, inventory: &mut Inventory, cancel: &CancellationToken) -> EnrichmentStats;
}

/// A no-operation enricher that does nothing.
///
/// Use this when enrichment is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEnricher;

impl NoOpEnricher {
    /// Create a new no-op enricher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl InventoryEnricher for NoOpEnricher {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn version(&self) -> u32 {
        0
    }

    fn requirements(&self) -> Capabilities {
        Capabilities::default()
    }

    fn required_plugins(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn enrich(&self, _inventory: &mut Inventory, _cancel: &CancellationToken) -> EnrichmentStats {
        EnrichmentStats::empty()
    }
}

/// Run enrichers in order against one inventory.
///
/// Enrichers whose requirements the host cannot satisfy are skipped, and no
/// new enricher starts once `cancel` fires. Returns per-enricher stats.
pub fn run_enrichers(
    enrichers: &[Box<dyn InventoryEnricher>],
    inventory: &mut Inventory,
    host: &Capabilities,
    cancel: &CancellationToken,
) -> Vec<(&'static str, EnrichmentStats)> {
    let mut results = Vec::with_capacity(enrichers.len());

    for enricher in enrichers {
        let name = enricher.name();
        if cancel.is_cancelled() {
            tracing::warn!("Enrichment cancelled, not running {}", name);
            break;
        }

        if !enricher.requirements().satisfied_by(host) {
            tracing::info!("Skipping {}: requires network access", name);
            let mut stats = EnrichmentStats::empty();
            stats
                .errors
                .push(EnrichmentError::Skipped("requires network access".to_string()));
            results.push((name, stats));
            continue;
        }

        let stats = enricher.enrich(inventory, cancel);
        stats.log_summary(name);
        results.push((name, stats));
    }

    results
}
