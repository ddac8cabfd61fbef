//! Inventory enrichment.
//!
//! Enrichers run after extraction and mutate the package inventory in place.
//! The framework here covers the pieces every enricher shares: capability
//! declarations, cancellation, and statistics. Transitive dependency
//! resolution lives in [`depsdev`].
//!
//! # Example
//!
//! ```no_run
//! use transitive_enrich::enrichment::depsdev::{DepsDevClientConfig, DepsDevEnricher};
//! use transitive_enrich::enrichment::{CancellationToken, InventoryEnricher};
//! use transitive_enrich::model::Inventory;
//!
//! let enricher = DepsDevEnricher::pypi(DepsDevClientConfig::default()).unwrap();
//! let mut inventory = Inventory::default();
//! let stats = enricher.enrich(&mut inventory, &CancellationToken::new());
//! stats.log_summary(enricher.name());
//! ```

mod cancel;
pub mod depsdev;
mod stats;
mod traits;

pub use cancel::CancellationToken;
pub use depsdev::DepsDevEnricher;
pub use stats::{EnrichmentError, EnrichmentStats};
pub use traits::{Capabilities, InventoryEnricher, NetworkRequirement, NoOpEnricher, run_enrichers};
