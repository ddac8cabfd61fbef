//! **Transitive dependency enrichment for package inventories.**
//!
//! `transitive-enrich` takes an inventory of packages discovered in manifest
//! files and completes it with every transitive dependency, using the
//! pre-computed dependency graphs served by [deps.dev](https://deps.dev).
//!
//! Two ecosystems are supported:
//!
//! - **PyPI**: packages found in `requirements.txt`. Names are
//!   case-insensitive and normalized to lowercase.
//! - **Maven**: packages found in `pom.xml`. Names are `groupId:artifactId`
//!   and keep their casing; resolved packages carry Maven metadata recording
//!   whether they are transitive.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the [`Inventory`] and its [`Package`] entries.
//! - **[`enrichment`]**: the [`InventoryEnricher`] framework and the
//!   [`depsdev`](enrichment::depsdev) resolver: graph client, grouper,
//!   resolver and merger.
//! - **[`pipeline`]**: load → enrich → write helpers.
//! - **[`config`]**: YAML configuration with discovery and validation.
//!
//! ## Getting Started
//!
//! ```no_run
//! use transitive_enrich::enrichment::depsdev::{DepsDevClientConfig, DepsDevEnricher};
//! use transitive_enrich::{CancellationToken, Inventory, InventoryEnricher};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("inventory.json")?;
//!     let mut inventory = Inventory::from_json_str(&json)?;
//!
//!     let enricher = DepsDevEnricher::pypi(DepsDevClientConfig::default())?;
//!     let stats = enricher.enrich(&mut inventory, &CancellationToken::new());
//!
//!     println!(
//!         "{} packages after enrichment ({} added, {} manifests failed)",
//!         inventory.len(),
//!         stats.packages_added,
//!         stats.manifests_failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Enrichment never fails as a whole: a manifest whose packages cannot be
//! resolved is logged, counted in [`EnrichmentStats`] and left untouched.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod pipeline;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, DepsDevConfig, OutputConfig, Validatable};
pub use enrichment::{
    CancellationToken, Capabilities, DepsDevEnricher, EnrichmentError, EnrichmentStats,
    InventoryEnricher, NetworkRequirement, NoOpEnricher, run_enrichers,
};
pub use error::{EnrichError, EnrichmentErrorKind, ErrorContext, Result};
pub use model::{Ecosystem, Inventory, MavenMetadata, Package, PackageMetadata};
