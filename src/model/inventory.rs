//! The shared package inventory.

use super::Package;
use crate::error::{ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Ordered, mutable list of packages produced by upstream extractors.
///
/// Entries are addressed by index during enrichment. Existing entries are
/// never removed or reordered, so indices taken from a snapshot stay valid
/// while new entries are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Inventory {
    /// Create an inventory from a list of packages
    #[must_use]
    pub const fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Parse an inventory from a JSON document.
    ///
    /// Accepts either `{"packages": [...]}` or a bare array of packages.
    pub fn from_json_str(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Wrapped(Inventory),
            Bare(Vec<Package>),
        }

        let doc: Document = serde_json::from_str(content).context("parsing inventory JSON")?;
        Ok(match doc {
            Document::Wrapped(inv) => inv,
            Document::Bare(packages) => Self::new(packages),
        })
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing inventory")
    }

    /// Number of packages
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the inventory holds no packages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
