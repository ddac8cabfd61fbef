//! Partition an inventory into per-manifest groups.

use super::ecosystem::EcosystemDescriptor;
use crate::model::{Inventory, Package};
use indexmap::IndexMap;

/// A package snapshot along with its position in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPackage {
    pub package: Package,
    pub index: usize,
}

/// Packages declared in one manifest, keyed by normalized name.
pub type ManifestGroup = IndexMap<String, IndexedPackage>;

/// Manifest path to its group.
pub type ManifestGroups = IndexMap<String, ManifestGroup>;

/// Group eligible inventory entries by their declaring manifest.
///
/// An entry is eligible when one of `descriptor`'s producers tagged it and it
/// has at least one location. When two entries in one manifest normalize to
/// the same name, the later one takes the slot.
#[must_use]
pub fn group_packages(inventory: &Inventory, descriptor: &EcosystemDescriptor) -> ManifestGroups {
    let mut groups = ManifestGroups::new();

    for (index, package) in inventory.packages.iter().enumerate() {
        if !descriptor.is_eligible(package) {
            continue;
        }
        let Some(path) = package.manifest_path() else {
            continue;
        };

        let key = descriptor.normalize_name(&package.name);
        let previous = groups.entry(path.to_string()).or_default().insert(
            key,
            IndexedPackage {
                package: package.clone(),
                index,
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(
                "{}: {} declared more than once, using entry #{}",
                path,
                previous.package.name,
                index
            );
        }
    }

    groups
}
