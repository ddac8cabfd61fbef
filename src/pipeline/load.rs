//! Inventory loading.

use crate::error::{EnrichError, ErrorContext, Result};
use crate::model::Inventory;
use std::path::Path;

/// Read and parse an inventory JSON file.
pub fn load_inventory(path: &Path, quiet: bool) -> Result<Inventory> {
    if !quiet {
        tracing::info!("Loading inventory: {}", path.display());
    }

    let content = std::fs::read_to_string(path).map_err(|e| EnrichError::io(path, e))?;
    let inventory = Inventory::from_json_str(&content)
        .with_context(|| format!("loading {}", path.display()))?;

    if !quiet {
        tracing::info!("Loaded {} packages", inventory.len());
    }
    Ok(inventory)
}
