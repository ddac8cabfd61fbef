//! Fold resolved packages back into the inventory.
//!
//! Merging is two-phase: [`MergePlan::build`] reads the inventory and decides
//! every update and append, then [`MergePlan::apply`] performs the in-place
//! updates before appending anything. Existing entries never move, so the
//! indices captured by the grouper stay valid throughout.

use super::ecosystem::EcosystemDescriptor;
use super::group::ManifestGroup;
use crate::model::{Inventory, Package};
use std::collections::HashMap;

/// An in-place change to an existing inventory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub index: usize,
    pub version: String,
}

/// Counts of what a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub updated: usize,
    pub added: usize,
}

/// Update and append instructions for one manifest.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    updates: Vec<PlannedUpdate>,
    appends: Vec<Package>,
}

impl MergePlan {
    /// Plan how `resolved` lands in `inventory` for the manifest at `path`.
    ///
    /// A resolved package whose normalized name is declared in the manifest
    /// updates that entry's version. One that matches an entry already in the
    /// inventory for this manifest (e.g. appended by an earlier pass) only
    /// gains provenance. Everything else is appended.
    #[must_use]
    pub fn build(
        inventory: &Inventory,
        path: &str,
        group: &ManifestGroup,
        resolved: Vec<Package>,
        descriptor: &EcosystemDescriptor,
    ) -> Self {
        let mut existing: HashMap<String, usize> = inventory
            .packages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.purl_type == descriptor.purl_type && p.manifest_path() == Some(path))
            .map(|(i, p)| (descriptor.dedup_key(&p.name, &p.version), i))
            .collect();

        let mut plan = Self::default();
        for pkg in resolved {
            if let Some(direct) = group.get(&pkg.name) {
                plan.updates.push(PlannedUpdate {
                    index: direct.index,
                    version: pkg.version,
                });
                continue;
            }

            let key = descriptor.dedup_key(&pkg.name, &pkg.version);
            if let Some(&index) = existing.get(&key) {
                // already queued for append in this plan
                if index >= inventory.packages.len() {
                    continue;
                }
                plan.updates.push(PlannedUpdate {
                    index,
                    version: pkg.version,
                });
                continue;
            }

            existing.insert(key, inventory.packages.len() + plan.appends.len());
            plan.appends.push(pkg);
        }

        plan
    }

    /// Planned in-place updates
    #[must_use]
    pub fn updates(&self) -> &[PlannedUpdate] {
        &self.updates
    }

    /// Planned new entries
    #[must_use]
    pub fn appends(&self) -> &[Package] {
        &self.appends
    }

    /// Apply updates, then appends, tagging updated entries with `provenance`.
    pub fn apply(self, inventory: &mut Inventory, provenance: &str) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for update in self.updates {
            let Some(entry) = inventory.packages.get_mut(update.index) else {
                tracing::warn!("merge skipped stale inventory index {}", update.index);
                continue;
            };
            let mut changed = entry.add_plugin(provenance);
            if entry.version != update.version {
                entry.version = update.version;
                changed = true;
            }
            if changed {
                outcome.updated += 1;
            }
        }

        outcome.added = self.appends.len();
        inventory.packages.extend(self.appends);
        outcome
    }
}
