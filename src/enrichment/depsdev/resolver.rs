//! Resolve one manifest group into its transitive package set.

use super::client::DepsDevClient;
use super::ecosystem::EcosystemDescriptor;
use super::group::ManifestGroup;
use crate::enrichment::{CancellationToken, EnrichmentError, EnrichmentStats};
use crate::error::{EnrichError, EnrichmentErrorKind, Result};
use crate::model::Package;
use std::collections::HashSet;

/// Queries the graph service for every pinned package in a manifest.
pub struct Resolver<'a> {
    client: &'a DepsDevClient,
    descriptor: &'a EcosystemDescriptor,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub const fn new(client: &'a DepsDevClient, descriptor: &'a EcosystemDescriptor) -> Self {
        Self { client, descriptor }
    }

    /// Resolve every pinned package in `group` and return the union of their
    /// dependency graphs, deduplicated by normalized name and version.
    ///
    /// Unpinned packages are skipped and a failed lookup only skips that
    /// package. Fails with `NoDependenciesResolved` when lookups were
    /// attempted but nothing came back, and with a network error when
    /// `cancel` fires before the group is finished. Output order follows
    /// group order but callers should not rely on it.
    pub fn resolve(
        &self,
        path: &str,
        group: &ManifestGroup,
        cancel: &CancellationToken,
        stats: &mut EnrichmentStats,
    ) -> Result<Vec<Package>> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        let mut attempted = 0usize;

        for entry in group.values() {
            let pkg = &entry.package;
            if !pkg.is_pinned() {
                tracing::debug!("{}: skipping unpinned {}", path, pkg.name);
                stats.packages_unpinned += 1;
                continue;
            }

            if cancel.is_cancelled() {
                return Err(EnrichError::cancelled(format!("resolving {path}")));
            }

            attempted += 1;
            stats.packages_queried += 1;
            let graph = match self.client.fetch(
                &self.descriptor.ecosystem,
                &pkg.name,
                &pkg.version,
                cancel,
            ) {
                Ok(graph) => graph,
                Err(e) => {
                    tracing::warn!(
                        "deps.dev: failed to get dependencies for {}@{}: {}",
                        pkg.name,
                        pkg.version,
                        e
                    );
                    stats.lookups_failed += 1;
                    stats.errors.push(EnrichmentError::LookupFailed {
                        package: pkg.name.clone(),
                        version: pkg.version.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for node in graph.dependencies() {
                let key = &node.version_key;
                if !node.errors.is_empty() {
                    tracing::debug!(
                        "deps.dev reported errors for {}@{}: {}",
                        key.name,
                        key.version,
                        node.errors.join("; ")
                    );
                }

                let name = self.descriptor.normalize_name(&key.name);
                if !seen.insert(format!("{name}@{}", key.version)) {
                    continue;
                }

                result.push(Package {
                    metadata: self.descriptor.build_metadata(&name, node.relation),
                    name,
                    version: key.version.clone(),
                    purl_type: self.descriptor.purl_type.to_string(),
                    locations: vec![path.to_string()],
                    plugins: vec![self.descriptor.enricher_name.to_string()],
                });
            }
        }

        if cancel.is_cancelled() {
            return Err(EnrichError::cancelled(format!("resolving {path}")));
        }

        if result.is_empty() && attempted > 0 {
            return Err(EnrichError::enrichment(
                format!("resolving {path}"),
                EnrichmentErrorKind::NoDependenciesResolved(path.to_string()),
            ));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::depsdev::group::{IndexedPackage, group_packages};
    use crate::enrichment::depsdev::response::Relation;
    use crate::enrichment::depsdev::test_support::{FakeTransport, client};
    use crate::enrichment::depsdev::{POMXML_EXTRACTOR, REQUIREMENTS_EXTRACTOR};
    use crate::model::{Inventory, MavenMetadata, PackageMetadata};
    use std::sync::Arc;

    const PATH: &str = "requirements.txt";

    fn pypi_group(pkgs: &[(&str, &str)]) -> ManifestGroup {
        let inv = Inventory::new(
            pkgs.iter()
                .map(|(n, v)| {
                    Package::new(*n, *v, "pypi")
                        .with_location(PATH)
                        .with_plugin(REQUIREMENTS_EXTRACTOR)
                })
                .collect(),
        );
        group_packages(&inv, &EcosystemDescriptor::pypi())
            .swap_remove(PATH)
            .unwrap_or_default()
    }

    fn names(pkgs: &[Package]) -> Vec<String> {
        let mut names: Vec<_> = pkgs
            .iter()
            .map(|p| format!("{}@{}", p.name, p.version))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_root_node_is_never_emitted() {
        let transport = Arc::new(FakeTransport::default().with_graph(
            "pypi",
            "requests",
            "2.31.0",
            &[
                ("urllib3", "2.0.0", Relation::Direct),
                ("certifi", "2023.7.22", Relation::Indirect),
            ],
        ));
        let client = client(transport);
        let descriptor = EcosystemDescriptor::pypi();
        let mut stats = EnrichmentStats::new();

        let out = Resolver::new(&client, &descriptor)
            .resolve(
                PATH,
                &pypi_group(&[("requests", "2.31.0")]),
                &CancellationToken::new(),
                &mut stats,
            )
            .unwrap();

        assert_eq!(names(&out), vec!["certifi@2023.7.22", "urllib3@2.0.0"]);
        for pkg in &out {
            assert_eq!(pkg.purl_type, "pypi");
            assert_eq!(pkg.locations, vec![PATH.to_string()]);
            assert_eq!(pkg.plugins, vec![descriptor.enricher_name.to_string()]);
            assert!(pkg.metadata.is_none());
        }
    }

    #[test]
    fn test_shared_transitive_appears_once() {
        let transport = Arc::new(
            FakeTransport::default()
                .with_graph("pypi", "a", "1", &[("shared", "2.0", Relation::Indirect)])
                .with_graph(
                    "pypi",
                    "b",
                    "1",
                    &[
                        ("Shared", "2.0", Relation::Direct),
                        ("shared", "3.0", Relation::Indirect),
                    ],
                ),
        );
        let client = client(transport);
        let descriptor = EcosystemDescriptor::pypi();
        let mut stats = EnrichmentStats::new();

        let out = Resolver::new(&client, &descriptor)
            .resolve(
                PATH,
                &pypi_group(&[("a", "1"), ("b", "1")]),
                &CancellationToken::new(),
                &mut stats,
            )
            .unwrap();

        assert_eq!(names(&out), vec!["shared@2.0", "shared@3.0"]);
        assert_eq!(stats.packages_queried, 2);
    }

    #[test]
    fn test_unpinned_packages_are_not_queried() {
        let transport = Arc::new(FakeTransport::default().with_graph(
            "pypi",
            "flask",
            "3.0.0",
            &[("click", "8.1.7", Relation::Direct)],
        ));
        let client = client(Arc::clone(&transport));
        let descriptor = EcosystemDescriptor::pypi();
        let mut stats = EnrichmentStats::new();

        let out = Resolver::new(&client, &descriptor)
            .resolve(
                PATH,
                &pypi_group(&[("flask", "3.0.0"), ("django", "")]),
                &CancellationToken::new(),
                &mut stats,
            )
            .unwrap();

        assert_eq!(names(&out), vec!["click@8.1.7"]);
        assert_eq!(transport.request_count(), 1);
        assert_eq!(stats.packages_unpinned, 1);
    }

    #[test]
    fn test_all_unpinned_is_empty_not_an_error() {
        let transport = Arc::new(FakeTransport::default());
        let client = client(Arc::clone(&transport));
        let descriptor = EcosystemDescriptor::pypi();
        let mut stats = EnrichmentStats::new();

        let out = Resolver::new(&client, &descriptor)
            .resolve(
                PATH,
                &pypi_group(&[("flask", ""), ("django", "")]),
                &CancellationToken::new(),
                &mut stats,
            )
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_all_lookups_failing_is_no_dependencies_resolved() {
        let client = client(Arc::new(FakeTransport::default()));
        let descriptor = EcosystemDescriptor::pypi();
        let mut stats = EnrichmentStats::new();

        let err = Resolver::new(&client, &descriptor)
            .resolve(
                PATH,
                &pypi_group(&[("flask", "3.0.0")]),
                &CancellationToken::new(),
                &mut stats,
            )
            .unwrap_err();

        assert!(matches!(
            err.enrichment_kind(),
            Some(EnrichmentErrorKind::NoDependenciesResolved(p)) if p == PATH
        ));
        assert_eq!(stats.lookups_failed, 1);
    }

    #[test]
    fn test_one_failed_lookup_does_not_abort_group() {
        let transport = Arc::new(FakeTransport::default().with_graph(
            "pypi",
            "flask",
            "3.0.0",
            &[("click", "8.1.7", Relation::Direct)],
        ));
        let client = client(transport);
        let descriptor = EcosystemDescriptor::pypi();
        let mut stats = EnrichmentStats::new();

        let out = Resolver::new(&client, &descriptor)
            .resolve(
                PATH,
                &pypi_group(&[("missing", "0.1"), ("flask", "3.0.0")]),
                &CancellationToken::new(),
                &mut stats,
            )
            .unwrap();

        assert_eq!(names(&out), vec!["click@8.1.7"]);
        assert_eq!(stats.errors.len(), 1);
    }

    #[test]
    fn test_maven_metadata_and_casing() {
        let transport = Arc::new(FakeTransport::default().with_graph(
            "maven",
            "org.apache:commons",
            "1.0",
            &[
                ("org.apache:commons-io", "2.5", Relation::Indirect),
                ("com.Example:Lib", "3", Relation::Direct),
            ],
        ));
        let client = client(transport);
        let descriptor = EcosystemDescriptor::maven();
        let mut group = ManifestGroup::new();
        group.insert(
            "org.apache:commons".to_string(),
            IndexedPackage {
                package: Package::new("org.apache:commons", "1.0", "maven")
                    .with_location("pom.xml")
                    .with_plugin(POMXML_EXTRACTOR),
                index: 0,
            },
        );
        let mut stats = EnrichmentStats::new();

        let out = Resolver::new(&client, &descriptor)
            .resolve("pom.xml", &group, &CancellationToken::new(), &mut stats)
            .unwrap();

        let io = out.iter().find(|p| p.name == "org.apache:commons-io").unwrap();
        assert_eq!(
            io.metadata,
            Some(PackageMetadata::Maven(MavenMetadata {
                group_id: "org.apache".into(),
                artifact_id: "commons-io".into(),
                is_transitive: true,
            }))
        );
        assert_eq!(io.purl_type, "maven");

        let lib = out.iter().find(|p| p.name == "com.Example:Lib").unwrap();
        assert!(!lib.maven_metadata().unwrap().is_transitive);
    }

    #[test]
    fn test_cancellation_abandons_group() {
        let transport = Arc::new(FakeTransport::default().with_graph(
            "pypi",
            "flask",
            "3.0.0",
            &[("click", "8.1.7", Relation::Direct)],
        ));
        let client = client(Arc::clone(&transport));
        let descriptor = EcosystemDescriptor::pypi();
        let token = CancellationToken::new();
        token.cancel();
        let mut stats = EnrichmentStats::new();

        let err = Resolver::new(&client, &descriptor)
            .resolve(PATH, &pypi_group(&[("flask", "3.0.0")]), &token, &mut stats)
            .unwrap_err();

        assert!(err.is_network());
        assert_eq!(transport.request_count(), 0);
    }
}
