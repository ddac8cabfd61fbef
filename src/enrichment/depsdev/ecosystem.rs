//! Per-ecosystem behaviour for graph resolution.

use super::response::Relation;
use crate::model::{
    Ecosystem, MavenMetadata, PURL_TYPE_MAVEN, PURL_TYPE_PYPI, Package, PackageMetadata,
};

/// Enricher name for requirements.txt resolution.
pub const PYPI_ENRICHER_NAME: &str = "transitivedependency/requirements/depsdev";
/// Enricher name for pom.xml resolution.
pub const MAVEN_ENRICHER_NAME: &str = "transitivedependency/maven/depsdev";

/// requirements.txt extractor.
pub const REQUIREMENTS_EXTRACTOR: &str = "python/requirements";
/// Offline pom.xml extractor.
pub const POMXML_EXTRACTOR: &str = "java/pomxml";
/// pom.xml extractor that can be enhanced by enrichers.
pub const POMXML_ENHANCEABLE_EXTRACTOR: &str = "java/pomxmlenhanceable";
/// pom.xml extractor that resolves parents over the network.
pub const POMXML_NET_EXTRACTOR: &str = "java/pomxmlnet";

/// Everything that differs between ecosystems during resolution.
#[derive(Debug, Clone)]
pub struct EcosystemDescriptor {
    pub ecosystem: Ecosystem,
    /// Enricher name, used as the provenance tag
    pub enricher_name: &'static str,
    /// Producers whose packages are eligible for resolution
    pub producers: &'static [&'static str],
    /// Producer the host must run first
    pub required_producer: &'static str,
    pub purl_type: &'static str,
    metadata: fn(&str, Relation) -> Option<PackageMetadata>,
}

fn no_metadata(_name: &str, _relation: Relation) -> Option<PackageMetadata> {
    None
}

fn maven_metadata(name: &str, relation: Relation) -> Option<PackageMetadata> {
    Some(PackageMetadata::Maven(MavenMetadata::from_coordinates(
        name,
        relation.is_transitive(),
    )))
}

impl EcosystemDescriptor {
    /// PyPI: names are case-insensitive and normalized to lowercase.
    #[must_use]
    pub fn pypi() -> Self {
        Self {
            ecosystem: Ecosystem::PyPi,
            enricher_name: PYPI_ENRICHER_NAME,
            producers: &[REQUIREMENTS_EXTRACTOR],
            required_producer: REQUIREMENTS_EXTRACTOR,
            purl_type: PURL_TYPE_PYPI,
            metadata: no_metadata,
        }
    }

    /// Maven: `groupId:artifactId` names keep their exact casing.
    #[must_use]
    pub fn maven() -> Self {
        Self {
            ecosystem: Ecosystem::Maven,
            enricher_name: MAVEN_ENRICHER_NAME,
            producers: &[
                POMXML_EXTRACTOR,
                POMXML_ENHANCEABLE_EXTRACTOR,
                POMXML_NET_EXTRACTOR,
            ],
            required_producer: POMXML_ENHANCEABLE_EXTRACTOR,
            purl_type: PURL_TYPE_MAVEN,
            metadata: maven_metadata,
        }
    }

    /// Normalize a package name for comparison and output.
    #[must_use]
    pub fn normalize_name(&self, name: &str) -> String {
        if self.ecosystem.is_case_insensitive() {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Identity of a resolved package within one manifest.
    #[must_use]
    pub fn dedup_key(&self, name: &str, version: &str) -> String {
        format!("{}@{}", self.normalize_name(name), version)
    }

    /// Ecosystem metadata for a resolved node.
    #[must_use]
    pub fn build_metadata(&self, name: &str, relation: Relation) -> Option<PackageMetadata> {
        (self.metadata)(name, relation)
    }

    /// Whether an inventory entry came from one of this ecosystem's producers.
    #[must_use]
    pub fn is_eligible(&self, package: &Package) -> bool {
        package
            .plugins
            .iter()
            .any(|p| self.producers.contains(&p.as_str()))
    }
}
