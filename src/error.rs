use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for weightmap
#[derive(Error, Debug)]
pub enum WeightmapError {
    #[error("Config error: {0}\n\nTroubleshooting:\n- Check config file: ~/.config/weightmap/config.toml\n- Remove unknown keys or fix value types\n- Run with RUST_LOG=debug for more details")]
    Config(String),

    #[error("Manifest error in {path}: {message}\n\nTroubleshooting:\n- The file must be a JSON object of category -> list of filenames\n- A corrupt updated_weights.json is never re-fetched; delete it to fetch again\n- A corrupt weights.json is a packaging defect; reinstall it")]
    Manifest { path: PathBuf, message: String },

    #[error("Extension '{name}' failed: {source}")]
    Extension {
        name: String,
        #[source]
        source: Box<WeightmapError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    NotFound(String),
}

/// Reasons a remote manifest fetch did not produce a file
///
/// These are transient: the loader logs them and continues with local data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("fetch tool '{0}' not found in PATH")]
    ToolMissing(String),

    #[error("failed to start fetch tool: {0}")]
    Spawn(String),

    #[error("fetch tool exited unsuccessfully: {0}")]
    Exit(String),

    #[error("fetch timed out after {0:?}")]
    TimedOut(Duration),
}

pub type Result<T> = std::result::Result<T, WeightmapError>;
