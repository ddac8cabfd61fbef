//! Inventory data model.
//!
//! Upstream extractors produce an [`Inventory`] of [`Package`] records, each
//! tagged with the producer names that contributed it. Enrichers mutate the
//! inventory in place.

mod identifiers;
mod inventory;
mod package;

pub use identifiers::*;
pub use inventory::*;
pub use package::*;
