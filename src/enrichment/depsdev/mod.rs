//! Transitive dependency resolution via deps.dev.
//!
//! Packages discovered in a manifest (requirements.txt, pom.xml) are grouped
//! by manifest, each pinned package's pre-computed dependency graph is fetched
//! from the deps.dev API, and the union of those graphs is merged back into
//! the inventory: declared packages get their resolved version, everything
//! else is appended as a new entry.
//!
//! See: <https://docs.deps.dev/api/v3/>

mod cache;
mod client;
mod ecosystem;
mod group;
mod merge;
mod resolver;
pub mod response;

pub use cache::{CacheKey, ResolutionCache};
pub use client::{
    DEFAULT_BASE_URL, DepsDevClient, DepsDevClientConfig, HttpTransport, ReqwestTransport,
    TransportResponse,
};
pub use ecosystem::{
    EcosystemDescriptor, MAVEN_ENRICHER_NAME, POMXML_ENHANCEABLE_EXTRACTOR, POMXML_EXTRACTOR,
    POMXML_NET_EXTRACTOR, PYPI_ENRICHER_NAME, REQUIREMENTS_EXTRACTOR,
};
pub use group::{IndexedPackage, ManifestGroup, ManifestGroups, group_packages};
pub use merge::{MergeOutcome, MergePlan, PlannedUpdate};
pub use resolver::Resolver;

use crate::enrichment::traits::{Capabilities, InventoryEnricher, NetworkRequirement};
use crate::enrichment::{CancellationToken, EnrichmentError, EnrichmentStats};
use crate::error::Result;
use crate::model::{Inventory, Package};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Enricher that adds transitive dependencies for one ecosystem.
pub struct DepsDevEnricher {
    client: Arc<DepsDevClient>,
    descriptor: EcosystemDescriptor,
    parallel: bool,
}

impl DepsDevEnricher {
    /// Create an enricher with its own HTTP client.
    pub fn new(descriptor: EcosystemDescriptor, config: DepsDevClientConfig) -> Result<Self> {
        let client = DepsDevClient::new(config)?;
        Ok(Self::with_client(descriptor, Arc::new(client)))
    }

    /// Enricher for requirements.txt manifests.
    pub fn pypi(config: DepsDevClientConfig) -> Result<Self> {
        Self::new(EcosystemDescriptor::pypi(), config)
    }

    /// Enricher for pom.xml manifests.
    pub fn maven(config: DepsDevClientConfig) -> Result<Self> {
        Self::new(EcosystemDescriptor::maven(), config)
    }

    /// Create an enricher around an existing client (and its cache).
    #[must_use]
    pub fn with_client(descriptor: EcosystemDescriptor, client: Arc<DepsDevClient>) -> Self {
        Self {
            client,
            descriptor,
            parallel: true,
        }
    }

    /// Resolve manifests concurrently (default) or one at a time.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The ecosystem this enricher resolves.
    #[must_use]
    pub const fn descriptor(&self) -> &EcosystemDescriptor {
        &self.descriptor
    }
}

/// Outcome of resolving one manifest, before merging.
struct GroupResolution<'g> {
    path: &'g str,
    group: &'g ManifestGroup,
    result: Result<Vec<Package>>,
    stats: EnrichmentStats,
}

fn resolve_group<'g>(
    resolver: &Resolver<'_>,
    path: &'g str,
    group: &'g ManifestGroup,
    cancel: &CancellationToken,
) -> GroupResolution<'g> {
    let mut stats = EnrichmentStats::new();
    let result = resolver.resolve(path, group, cancel, &mut stats);
    GroupResolution {
        path,
        group,
        result,
        stats,
    }
}

impl InventoryEnricher for DepsDevEnricher {
    fn name(&self) -> &'static str {
        self.descriptor.enricher_name
    }

    fn version(&self) -> u32 {
        0
    }

    fn requirements(&self) -> Capabilities {
        Capabilities {
            network: NetworkRequirement::Online,
        }
    }

    fn required_plugins(&self) -> Vec<&'static str> {
        vec![self.descriptor.required_producer]
    }

    fn enrich(&self, inventory: &mut Inventory, cancel: &CancellationToken) -> EnrichmentStats {
        let start = Instant::now();
        let mut stats = EnrichmentStats::new();
        let hits_before = self.client.cache_hits();
        let calls_before = self.client.api_calls();

        let groups = group_packages(inventory, &self.descriptor);
        stats.manifests_seen = groups.len();

        // Resolution only reads the snapshot, so manifests can run concurrently.
        let resolver = Resolver::new(&self.client, &self.descriptor);
        let resolutions: Vec<GroupResolution<'_>> = if self.parallel {
            let entries: Vec<_> = groups.iter().collect();
            entries
                .into_par_iter()
                .map(|(path, group)| resolve_group(&resolver, path, group, cancel))
                .collect()
        } else {
            groups
                .iter()
                .map(|(path, group)| resolve_group(&resolver, path, group, cancel))
                .collect()
        };

        // Merges run one manifest at a time.
        for resolution in resolutions {
            stats.merge(&resolution.stats);
            let path = resolution.path;

            match resolution.result {
                Ok(packages) => {
                    let plan = MergePlan::build(
                        inventory,
                        path,
                        resolution.group,
                        packages,
                        &self.descriptor,
                    );
                    let outcome = plan.apply(inventory, self.descriptor.enricher_name);
                    tracing::debug!(
                        "{}: {} updated, {} added",
                        path,
                        outcome.updated,
                        outcome.added
                    );
                    stats.packages_updated += outcome.updated;
                    stats.packages_added += outcome.added;
                }
                Err(e) if e.is_cancelled() => {
                    tracing::warn!("deps.dev resolution cancelled for {}", path);
                    stats.manifests_failed += 1;
                    stats.errors.push(EnrichmentError::Cancelled {
                        path: path.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("deps.dev resolution failed for {}: {}", path, e);
                    stats.manifests_failed += 1;
                    stats.errors.push(EnrichmentError::ManifestFailed {
                        path: path.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        stats.cache_hits = self.client.cache_hits().saturating_sub(hits_before);
        stats.api_calls = self.client.api_calls().saturating_sub(calls_before);
        stats.duration = start.elapsed();
        stats
    }
}
