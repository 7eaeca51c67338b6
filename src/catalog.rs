//! JSON catalog files
//!
//! A catalog is a JSON array of entries. Each entry carries either a stored
//! fingerprint or the path of an image to fingerprint on load; relative image
//! paths resolve against the catalog file's directory.

use anyhow::{anyhow, Context, Result};
use pixmatch_core::{CatalogItem, Fingerprint, ItemId};
use pixmatch_vision::FeaturePipeline;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
}

impl CatalogEntry {
    /// Resolve into a catalog item, fingerprinting the image when no fingerprint is stored
    pub fn into_item(self, pipeline: &FeaturePipeline, base_dir: &Path) -> Result<CatalogItem> {
        let fingerprint = match (self.fingerprint, &self.image) {
            (Some(fingerprint), _) => fingerprint,
            (None, Some(image)) => {
                let path = base_dir.join(image);
                pipeline
                    .fingerprint_path(&path)
                    .with_context(|| format!("fingerprinting {} for item {}", path.display(), self.id))?
            }
            (None, None) => return Err(anyhow!("Item {} has neither an image nor a fingerprint", self.id)),
        };

        Ok(CatalogItem::new(self.id, fingerprint, self.category, self.price))
    }
}

/// Parse catalog entries from a JSON file
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<CatalogEntry>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let entries: Vec<CatalogEntry> =
        serde_json::from_slice(&data).with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(entries)
}

/// Load a catalog file and resolve every entry to a fingerprinted item
pub fn load_catalog(path: impl AsRef<Path>, pipeline: &FeaturePipeline) -> Result<Vec<CatalogItem>> {
    let path = path.as_ref();
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let entries = read_entries(path)?;

    let items = entries
        .into_par_iter()
        .map(|entry| entry.into_item(pipeline, base_dir))
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} catalog items from {}", items.len(), path.display());
    Ok(items)
}
