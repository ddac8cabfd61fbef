//! Package records as they appear in an inventory.

use super::identifiers::PURL_TYPE_MAVEN;
use packageurl::PackageUrl;
use serde::{Deserialize, Serialize};

/// A discovered or resolved dependency.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    /// Package name (ecosystem casing rules apply)
    pub name: String,
    /// Version, empty when the manifest does not pin one
    #[serde(default)]
    pub version: String,
    /// Package-URL type (e.g. "pypi", "maven")
    pub purl_type: String,
    /// Origin locations; the first entry is the declaring manifest
    #[serde(default)]
    pub locations: Vec<String>,
    /// Names of the producers that contributed this entry
    #[serde(default)]
    pub plugins: Vec<String>,
    /// Ecosystem-specific metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PackageMetadata>,
}

/// Ecosystem-specific package metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackageMetadata {
    Maven(MavenMetadata),
}

/// Maven coordinates plus whether the artifact was pulled in transitively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MavenMetadata {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub is_transitive: bool,
}

impl MavenMetadata {
    /// Split a `groupId:artifactId` name on its first colon.
    ///
    /// A name without a colon yields an empty artifact id.
    #[must_use]
    pub fn from_coordinates(name: &str, is_transitive: bool) -> Self {
        let (group_id, artifact_id) = name.split_once(':').unwrap_or((name, ""));
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            is_transitive,
        }
    }
}

impl Package {
    /// Create a package with no locations or provenance.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        purl_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            purl_type: purl_type.into(),
            ..Self::default()
        }
    }

    /// Builder-style location setter
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    /// Builder-style provenance setter
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.add_plugin(plugin);
        self
    }

    /// Builder-style metadata setter
    #[must_use]
    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The declaring manifest, if any location was recorded.
    #[must_use]
    pub fn manifest_path(&self) -> Option<&str> {
        self.locations.first().map(String::as_str)
    }

    /// Whether the version is pinned.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        !self.version.is_empty()
    }

    /// Whether `plugin` is already recorded in the provenance list.
    #[must_use]
    pub fn has_plugin(&self, plugin: &str) -> bool {
        self.plugins.iter().any(|p| p == plugin)
    }

    /// Append a provenance tag unless it is already present.
    ///
    /// Returns true if the tag was added.
    pub fn add_plugin(&mut self, plugin: impl Into<String>) -> bool {
        let plugin = plugin.into();
        if self.has_plugin(&plugin) {
            return false;
        }
        self.plugins.push(plugin);
        true
    }

    /// Maven metadata, if present.
    #[must_use]
    pub const fn maven_metadata(&self) -> Option<&MavenMetadata> {
        match &self.metadata {
            Some(PackageMetadata::Maven(m)) => Some(m),
            None => None,
        }
    }

    /// Render the package URL, e.g. `pkg:pypi/requests@2.31.0`.
    ///
    /// Maven names are split into namespace (group id) and name (artifact id).
    /// Returns None when the name cannot form a valid package URL.
    #[must_use]
    pub fn purl(&self) -> Option<String> {
        let (namespace, name) = if self.purl_type == PURL_TYPE_MAVEN {
            match self.name.split_once(':') {
                Some((group, artifact)) => (Some(group), artifact),
                None => (None, self.name.as_str()),
            }
        } else {
            (None, self.name.as_str())
        };

        let mut purl = PackageUrl::new(self.purl_type.as_str(), name).ok()?;
        if let Some(ns) = namespace {
            purl.with_namespace(ns);
        }
        if self.is_pinned() {
            purl.with_version(self.version.as_str());
        }
        Some(purl.to_string())
    }
}
