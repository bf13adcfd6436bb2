pub mod fetch;
pub mod loader;

pub use fetch::{fetch_updated, FetchOutcome};
pub use loader::{LoadedManifest, ManifestLoader};

use crate::error::{Result, WeightmapError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Weight categories mapped to their known filenames
///
/// Upper-case category names are "standard" and get archive URLs built for
/// them; anything else is bookkeeping and stays out of the weights map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    categories: IndexMap<String, Vec<String>>,
}

impl Manifest {
    /// Load a manifest file; a missing file is an empty manifest
    ///
    /// Malformed JSON is returned as an error rather than treated as empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| WeightmapError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Fold another manifest into this one without removing or reordering anything
    ///
    /// Filenames missing from an existing category are appended in `updated`'s
    /// order. Categories only present in `updated` are taken as-is.
    pub fn merge(&mut self, updated: Self) {
        for (key, items) in updated.categories {
            match self.categories.get_mut(&key) {
                Some(existing) => {
                    for item in items {
                        if !existing.contains(&item) {
                            tracing::debug!("Adding {item} to {key}");
                            existing.push(item);
                        }
                    }
                }
                None => {
                    tracing::debug!("Adding category {key} ({} weights)", items.len());
                    self.categories.insert(key, items);
                }
            }
        }
    }

    /// Filenames listed under a category, empty if the category is unknown
    #[must_use]
    pub fn weights_by_type(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Caller-supplied weights: category -> filename -> explicit URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByoManifest {
    categories: IndexMap<String, IndexMap<String, String>>,
}

impl ByoManifest {
    /// Load a bring-your-own manifest file (the file must exist)
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WeightmapError::NotFound(format!(
                "Could not read bring-your-own manifest {}: {e}",
                path.display()
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| WeightmapError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, IndexMap<String, String>)> for ByoManifest {
    fn from_iter<I: IntoIterator<Item = (K, IndexMap<String, String>)>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
