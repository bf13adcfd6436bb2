use crate::config::WeightsConfig;
use crate::error::{Result, WeightmapError};
use crate::manifest::{ByoManifest, Manifest};
use crate::weights::extension::ExtensionRegistry;
use crate::weights::{is_standard_category, WeightEntry, WeightsMap};

/// Flattens manifests and extensions into one filename -> entry map
///
/// Sources are applied in order (standard categories, bring-your-own,
/// extensions) and a later source overwrites an earlier entry with the
/// same filename.
pub struct WeightsMapBuilder {
    base_url: String,
    base_path: String,
}

impl WeightsMapBuilder {
    #[must_use]
    pub fn new(config: &WeightsConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            base_path: config.base_path.clone(),
        }
    }

    /// Build the complete weights map
    ///
    /// # Errors
    /// Returns the first error raised by an extension.
    pub fn build(
        &self,
        manifest: &Manifest,
        byo: Option<&ByoManifest>,
        extensions: &ExtensionRegistry,
    ) -> Result<WeightsMap> {
        let mut weights_map = self.standard_weights(manifest);

        if let Some(byo) = byo {
            weights_map.extend(self.bring_your_own_weights(byo));
        }

        for extension in extensions.iter() {
            let name = extension.name();
            let entries = extension
                .weights_map(&self.base_url)
                .map_err(|e| match e {
                    WeightmapError::Extension { .. } => e,
                    other => WeightmapError::Extension {
                        name: name.to_string(),
                        source: Box::new(other),
                    },
                })?;
            tracing::debug!("Extension {name} contributed {} weights", entries.len());
            weights_map.extend(entries);
        }

        Ok(weights_map)
    }

    /// Archive entries for every upper-case category
    #[must_use]
    pub fn standard_weights(&self, manifest: &Manifest) -> WeightsMap {
        let mut weights_map = WeightsMap::new();
        for (category, filenames) in manifest.categories() {
            if !is_standard_category(category) {
                continue;
            }
            let dest = category.to_lowercase();
            for filename in filenames {
                weights_map.insert(
                    filename.clone(),
                    WeightEntry::new(
                        format!("{}/{dest}/{filename}.tar", self.base_url),
                        format!("{}/{dest}", self.base_path),
                    ),
                );
            }
        }
        weights_map
    }

    /// Single-file entries with caller-provided URLs
    ///
    /// Unlike archive entries, `dest` is the full file path.
    #[must_use]
    pub fn bring_your_own_weights(&self, byo: &ByoManifest) -> WeightsMap {
        let mut weights_map = WeightsMap::new();
        for (category, urls) in byo.categories() {
            let dest = category.to_lowercase();
            for (filename, url) in urls {
                tracing::debug!("Bring-your-own weight {filename} from {url}");
                weights_map.insert(
                    filename.clone(),
                    WeightEntry::new(url.as_str(), format!("{}/{dest}/{filename}", self.base_path)),
                );
            }
        }
        weights_map
    }
}
