use crate::config::ManifestConfig;
use crate::error::Result;
use crate::manifest::fetch::{fetch_updated, FetchOutcome};
use crate::manifest::Manifest;

/// Merged manifest plus what happened to the remote fetch
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    /// `None` when fetching was disabled
    pub fetch: Option<FetchOutcome>,
}

/// Produces the merged manifest from the bundled file and the cached update
pub struct ManifestLoader {
    config: ManifestConfig,
}

impl ManifestLoader {
    #[must_use]
    pub const fn new(config: ManifestConfig) -> Self {
        Self { config }
    }

    /// Optionally fetch the updated manifest, then merge it over the bundled one
    ///
    /// Fetch problems are logged and ignored. A malformed manifest file on
    /// disk is an error.
    pub fn load(&self, download_remote: bool) -> Result<LoadedManifest> {
        let fetch = download_remote.then(|| fetch_updated(&self.config));

        let mut manifest = Manifest::load(&self.config.bundled_path)?;
        let updated = Manifest::load(&self.config.updated_path)?;
        manifest.merge(updated);

        Ok(LoadedManifest { manifest, fetch })
    }
}
