use crate::error::{Result, WeightmapError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub extensions: Vec<ExtensionConfig>,
}

/// Where manifests live and how the updated one is fetched
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ManifestConfig {
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    #[serde(default = "default_bundled_path")]
    pub bundled_path: PathBuf,
    #[serde(default = "default_updated_path")]
    pub updated_path: PathBuf,
    #[serde(default = "default_true")]
    pub download_latest: bool,
    #[serde(default = "default_fetch_tool")]
    pub fetch_tool: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: f64,
}

/// Roots used to build archive URLs and local destinations
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct WeightsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

/// Weights contributed by a named extension
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub name: String,
    #[serde(default)]
    pub weights: BTreeMap<String, ExtensionWeight>,
}

/// One extension weight; `path` is appended to the base URL
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtensionWeight {
    pub path: String,
    pub dest: String,
}

// Default value functions
fn default_remote_url() -> String {
    "https://raw.githubusercontent.com/fofr/cog-comfyui/main/weights.json".to_string()
}
fn default_bundled_path() -> PathBuf {
    PathBuf::from("weights.json")
}
fn default_updated_path() -> PathBuf {
    PathBuf::from("updated_weights.json")
}
fn default_true() -> bool {
    true
}
fn default_fetch_tool() -> String {
    "pget".to_string()
}
fn default_fetch_timeout_secs() -> f64 {
    5.0
}
fn default_base_url() -> String {
    "https://weights.replicate.delivery/default/comfy-ui".to_string()
}
fn default_base_path() -> String {
    "ComfyUI/models".to_string()
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
            bundled_path: default_bundled_path(),
            updated_path: default_updated_path(),
            download_latest: default_true(),
            fetch_tool: default_fetch_tool(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            base_path: default_base_path(),
        }
    }
}

impl ManifestConfig {
    /// Upper bound on the remote fetch
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.fetch_timeout_secs).unwrap_or(Duration::ZERO)
    }
}

impl Config {
    /// Load config from the user config directory, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from an explicit TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WeightmapError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| {
            WeightmapError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

/// Get config file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| WeightmapError::Config("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("weightmap").join("config.toml"))
}
