use crate::config::Config;
use crate::error::Result;
use crate::license;
use crate::manifest::{ByoManifest, FetchOutcome, Manifest, ManifestLoader};
use crate::weights::{ExtensionRegistry, WeightEntry, WeightsMap, WeightsMapBuilder};

/// Merged manifest and weights map, built once and read-only afterwards
#[derive(Debug, Clone)]
pub struct Resolver {
    manifest: Manifest,
    weights_map: WeightsMap,
    fetch: Option<FetchOutcome>,
}

impl Resolver {
    /// Load manifests and build the weights map
    ///
    /// Fetching the updated manifest follows `config.manifest.download_latest`.
    ///
    /// # Errors
    /// - Returns error if a manifest file on disk is malformed
    /// - Returns error if an extension fails
    pub fn new(
        config: &Config,
        byo: Option<&ByoManifest>,
        extensions: &ExtensionRegistry,
    ) -> Result<Self> {
        Self::with_download(config, config.manifest.download_latest, byo, extensions)
    }

    /// Like [`Resolver::new`] with an explicit fetch decision
    pub fn with_download(
        config: &Config,
        download_remote: bool,
        byo: Option<&ByoManifest>,
        extensions: &ExtensionRegistry,
    ) -> Result<Self> {
        let loaded = ManifestLoader::new(config.manifest.clone()).load(download_remote)?;
        let weights_map =
            WeightsMapBuilder::new(&config.weights).build(&loaded.manifest, byo, extensions)?;

        tracing::debug!(
            "Resolved {} weights from {} categories",
            weights_map.len(),
            loaded.manifest.categories().count()
        );

        Ok(Self {
            manifest: loaded.manifest,
            weights_map,
            fetch: loaded.fetch,
        })
    }

    /// Filenames in a merged manifest category, empty if unknown
    #[must_use]
    pub fn get_weights_by_type(&self, category: &str) -> &[String] {
        self.manifest.weights_by_type(category)
    }

    #[must_use]
    pub fn is_non_commercial_only(&self, filename: &str) -> bool {
        license::is_non_commercial_only(filename)
    }

    #[must_use]
    pub fn lookup(&self, filename: &str) -> Option<&WeightEntry> {
        self.weights_map.get(filename)
    }

    #[must_use]
    pub const fn weights_map(&self) -> &WeightsMap {
        &self.weights_map
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.manifest.categories().map(|(name, _)| name)
    }

    /// Outcome of the remote fetch, `None` if it was not attempted
    #[must_use]
    pub const fn fetch_outcome(&self) -> Option<&FetchOutcome> {
        self.fetch.as_ref()
    }
}
