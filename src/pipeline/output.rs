//! Output handling for enriched inventories.

use crate::model::Inventory;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Serialize an inventory as JSON.
pub fn render_inventory(inventory: &Inventory, compact: bool) -> Result<String> {
    if compact {
        serde_json::to_string(inventory).context("Failed to serialize inventory")
    } else {
        inventory
            .to_json_pretty()
            .context("Failed to serialize inventory")
    }
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Inventory written to {}", path.display());
            }
            Ok(())
        }
    }
}
