use crate::config::ExtensionConfig;
use crate::error::Result;
use crate::weights::{WeightEntry, WeightsMap};

/// A source of extra weights, typically one per installed extension
///
/// Entries returned here are merged last and override anything the
/// manifests produced for the same filename.
pub trait WeightsExtension {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Weights this extension needs, given the standard archive base URL
    fn weights_map(&self, base_url: &str) -> Result<WeightsMap>;
}

/// Ordered set of extensions consulted when building the weights map
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn WeightsExtension>>,
}

impl ExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one `TemplateExtension` per configured extension
    #[must_use]
    pub fn from_config(configs: &[ExtensionConfig]) -> Self {
        let mut registry = Self::new();
        for config in configs {
            registry.register(TemplateExtension::from_config(config));
        }
        registry
    }

    pub fn register(&mut self, extension: impl WeightsExtension + 'static) {
        self.extensions.push(Box::new(extension));
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn WeightsExtension> {
        self.extensions
            .iter()
            .map(|ext| &**ext as &dyn WeightsExtension)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Extension whose weights are declared up front as paths under the base URL
#[derive(Debug, Clone)]
pub struct TemplateExtension {
    name: String,
    // (filename, path relative to base URL, dest)
    weights: Vec<(String, String, String)>,
}

impl TemplateExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_weight(
        mut self,
        filename: impl Into<String>,
        path: impl Into<String>,
        dest: impl Into<String>,
    ) -> Self {
        self.weights
            .push((filename.into(), path.into(), dest.into()));
        self
    }

    #[must_use]
    pub fn from_config(config: &ExtensionConfig) -> Self {
        config
            .weights
            .iter()
            .fold(Self::new(&config.name), |ext, (filename, weight)| {
                ext.with_weight(filename, &weight.path, &weight.dest)
            })
    }
}

impl WeightsExtension for TemplateExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn weights_map(&self, base_url: &str) -> Result<WeightsMap> {
        Ok(self
            .weights
            .iter()
            .map(|(filename, path, dest)| {
                (
                    filename.clone(),
                    WeightEntry::new(format!("{base_url}/{path}"), dest.as_str()),
                )
            })
            .collect())
    }
}
