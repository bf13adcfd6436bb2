//! Resolver configuration
//!
//! `config.toml` under the user config dir (`~/.config/weightmap/`) may override
//! the manifest locations, the fetch tool and its timeout, the archive base URL
//! and the local model root, and declare extension weights. Every field is
//! optional; an empty or missing file resolves exactly like the built-in
//! defaults (`weights.json`, `updated_weights.json`, `pget`, 5s, `ComfyUI/models`).
//!
//! ```toml
//! [manifest]
//! download_latest = false
//!
//! [weights]
//! base_path = "/srv/comfy/models"
//!
//! [[extensions]]
//! name = "rembg"
//! [extensions.weights."RMBG-1.4/model.pth"]
//! path = "custom_nodes/rmbg/RMBG-1.4.tar"
//! dest = "ComfyUI/custom_nodes/rmbg"
//! ```

pub mod schema;

pub use schema::{Config, ExtensionConfig, ExtensionWeight, ManifestConfig, WeightsConfig};
