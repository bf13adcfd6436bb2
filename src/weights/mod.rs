pub mod builder;
pub mod extension;

pub use builder::WeightsMapBuilder;
pub use extension::{ExtensionRegistry, TemplateExtension, WeightsExtension};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a weight file is fetched from and where it lands locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub url: String,
    pub dest: String,
}

impl WeightEntry {
    pub fn new(url: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
        }
    }
}

/// Filename -> download entry
pub type WeightsMap = BTreeMap<String, WeightEntry>;

/// Whether a manifest category gets archive URLs built for it
///
/// Needs at least one cased character and no lower-case ones, so
/// `CLIP_VISION` qualifies while `loras` and `123` do not.
#[must_use]
pub fn is_standard_category(category: &str) -> bool {
    category.chars().any(char::is_uppercase) && !category.chars().any(char::is_lowercase)
}
