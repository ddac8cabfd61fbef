//! deps.dev dependency graph response types.
//!
//! See: <https://docs.deps.dev/api/v3/#getdependencies>

use serde::{Deserialize, Serialize};

/// Resolved dependency graph for one package version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A single package version in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub version_key: VersionKey,
    #[serde(default)]
    pub bundled: bool,
    pub relation: Relation,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Identifies a package version within a system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionKey {
    #[serde(default)]
    pub system: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// How a node relates to the queried package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    /// The queried package itself
    #[serde(rename = "SELF")]
    Root,
    Direct,
    Indirect,
    #[serde(other)]
    Unknown,
}

/// Requirement edge between two nodes, by index into `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from_node: usize,
    pub to_node: usize,
    #[serde(default)]
    pub requirement: String,
}

impl Relation {
    /// Whether the node was reached through another dependency.
    #[must_use]
    pub const fn is_transitive(self) -> bool {
        matches!(self, Self::Indirect)
    }
}

impl Node {
    /// Build a node; mostly useful for tests and fixtures.
    pub fn new(
        system: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        relation: Relation,
    ) -> Self {
        Self {
            version_key: VersionKey {
                system: system.into(),
                name: name.into(),
                version: version.into(),
            },
            bundled: false,
            relation,
            errors: Vec::new(),
        }
    }
}

impl DependencyGraph {
    /// The node for the queried package.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.relation == Relation::Root)
    }

    /// All nodes except the queried package.
    pub fn dependencies(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.relation != Relation::Root)
    }
}
