use indexmap::IndexMap;
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use weightmap::config::{Config, ExtensionConfig, ExtensionWeight, ManifestConfig};
use weightmap::error::WeightmapError;
use weightmap::manifest::{ByoManifest, FetchOutcome};
use weightmap::weights::{ExtensionRegistry, TemplateExtension, WeightEntry};
use weightmap::Resolver;

const BASE_URL: &str = "https://weights.replicate.delivery/default/comfy-ui";
const BASE_PATH: &str = "ComfyUI/models";

/// Config rooted in a temp dir with a fetch tool that cannot exist
fn test_config(dir: &Path) -> Config {
    Config {
        manifest: ManifestConfig {
            bundled_path: dir.join("weights.json"),
            updated_path: dir.join("updated_weights.json"),
            fetch_tool: "weightmap-test-missing-tool".to_string(),
            ..ManifestConfig::default()
        },
        ..Config::default()
    }
}

#[test]
fn test_bundled_manifest_only() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    fs::write(&config.manifest.bundled_path, r#"{"CHECKPOINTS": ["a.safetensors"]}"#).unwrap();

    let resolver =
        Resolver::with_download(&config, false, None, &ExtensionRegistry::new()).unwrap();

    assert_eq!(resolver.weights_map().len(), 1);
    assert_eq!(
        resolver.lookup("a.safetensors"),
        Some(&WeightEntry::new(
            format!("{BASE_URL}/checkpoints/a.safetensors.tar"),
            format!("{BASE_PATH}/checkpoints")
        ))
    );
    assert!(resolver.fetch_outcome().is_none());
}

#[test]
fn test_missing_manifests_give_empty_resolver() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());

    let resolver =
        Resolver::with_download(&config, false, None, &ExtensionRegistry::new()).unwrap();

    assert!(resolver.weights_map().is_empty());
    assert!(resolver.get_weights_by_type("CHECKPOINTS").is_empty());
    assert_eq!(resolver.categories().count(), 0);
}

#[test]
fn test_failed_fetch_falls_back_to_bundled() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    fs::write(&config.manifest.bundled_path, r#"{"VAE": ["v.safetensors"]}"#).unwrap();

    let resolver = Resolver::new(&config, None, &ExtensionRegistry::new()).unwrap();

    assert!(resolver.fetch_outcome().is_some_and(FetchOutcome::is_failed));
    assert!(resolver.lookup("v.safetensors").is_some());
}

#[test]
fn test_updated_manifest_is_merged() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    fs::write(
        &config.manifest.bundled_path,
        r#"{"CHECKPOINTS": ["x.safetensors"], "loras": ["l.safetensors"]}"#,
    )
    .unwrap();
    fs::write(
        &config.manifest.updated_path,
        r#"{"CHECKPOINTS": ["x.safetensors", "y.safetensors"], "NEWCAT": ["n.bin"]}"#,
    )
    .unwrap();

    let resolver = Resolver::new(&config, None, &ExtensionRegistry::new()).unwrap();

    assert_eq!(resolver.fetch_outcome(), Some(&FetchOutcome::AlreadyCached));
    assert_eq!(
        resolver.get_weights_by_type("CHECKPOINTS"),
        ["x.safetensors".to_string(), "y.safetensors".to_string()]
    );
    assert_eq!(resolver.get_weights_by_type("NEWCAT"), ["n.bin".to_string()]);
    assert_eq!(
        resolver.get_weights_by_type("loras"),
        ["l.safetensors".to_string()]
    );
    assert_eq!(
        resolver.lookup("n.bin").map(|e| e.dest.as_str()),
        Some("ComfyUI/models/newcat")
    );
    // lower-case categories are listed but not downloadable
    assert!(resolver.lookup("l.safetensors").is_none());
    let categories: Vec<&str> = resolver.categories().collect();
    assert_eq!(categories, vec!["CHECKPOINTS", "loras", "NEWCAT"]);
}

#[test]
fn test_malformed_bundled_manifest_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    fs::write(&config.manifest.bundled_path, "not json").unwrap();

    let result = Resolver::with_download(&config, false, None, &ExtensionRegistry::new());
    assert!(matches!(result, Err(WeightmapError::Manifest { .. })));
}

#[test]
fn test_byo_and_extensions() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(temp_dir.path());
    config.weights.base_path = "/models".to_string();
    fs::write(
        &config.manifest.bundled_path,
        r#"{"CHECKPOINTS": ["a.safetensors", "b.safetensors"]}"#,
    )
    .unwrap();

    let urls: IndexMap<String, String> = [(
        "custom.safetensors".to_string(),
        "https://example/custom.safetensors".to_string(),
    )]
    .into_iter()
    .collect();
    let byo: ByoManifest = [("loras", urls)].into_iter().collect();

    let mut weights = std::collections::BTreeMap::new();
    weights.insert(
        "b.safetensors".to_string(),
        ExtensionWeight {
            path: "custom_nodes/b.tar".to_string(),
            dest: "ComfyUI/custom_nodes/ext".to_string(),
        },
    );
    config.extensions.push(ExtensionConfig {
        name: "ext".to_string(),
        weights,
    });
    let mut extensions = ExtensionRegistry::from_config(&config.extensions);
    extensions.register(TemplateExtension::new("late").with_weight(
        "c.onnx",
        "onnx/c.tar",
        "ComfyUI/models/onnx",
    ));

    let resolver = Resolver::with_download(&config, false, Some(&byo), &extensions).unwrap();
    let map = resolver.weights_map();

    assert_eq!(map.len(), 4);
    assert_eq!(map["a.safetensors"].dest, "/models/checkpoints");
    assert_eq!(
        map["custom.safetensors"],
        WeightEntry::new(
            "https://example/custom.safetensors",
            "/models/loras/custom.safetensors"
        )
    );
    assert_eq!(map["b.safetensors"].url, format!("{BASE_URL}/custom_nodes/b.tar"));
    assert_eq!(map["c.onnx"].url, format!("{BASE_URL}/onnx/c.tar"));
}

#[test]
fn test_non_commercial_classifier() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());
    let resolver =
        Resolver::with_download(&config, false, None, &ExtensionRegistry::new()).unwrap();

    assert!(resolver.is_non_commercial_only("svd.safetensors"));
    assert!(!resolver.is_non_commercial_only("svd.safetensors "));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_fetched_manifest_feeds_weights_map() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(temp_dir.path());

    // Stand-in for pget: writes the manifest to the destination argument
    let tool = temp_dir.path().join("fake-pget");
    fs::write(
        &tool,
        "#!/bin/sh\nprintf '{\"UPSCALE_MODELS\": [\"4x.pth\"]}' > \"$5\"\n",
    )
    .unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
    config.manifest.fetch_tool = tool.to_string_lossy().into_owned();
    config.manifest.fetch_timeout_secs = 10.0;

    let resolver = Resolver::new(&config, None, &ExtensionRegistry::new()).unwrap();

    assert!(matches!(
        resolver.fetch_outcome(),
        Some(FetchOutcome::Fetched { .. })
    ));
    assert_eq!(
        resolver.lookup("4x.pth"),
        Some(&WeightEntry::new(
            format!("{BASE_URL}/upscale_models/4x.pth.tar"),
            format!("{BASE_PATH}/upscale_models")
        ))
    );

    // A second resolver reuses the cached file without fetching
    let again = Resolver::new(&config, None, &ExtensionRegistry::new()).unwrap();
    assert_eq!(again.fetch_outcome(), Some(&FetchOutcome::AlreadyCached));
    assert!(again.lookup("4x.pth").is_some());
}
