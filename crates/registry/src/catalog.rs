//! Loading integration manifests from the embedded catalog or from disk.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use soar_types::IntegrationManifest;
use tracing::{debug, info};

use crate::error::RegistryError;

/// Manifests compiled into the binary, keyed by file name.
const EMBEDDED_CATALOG: &[(&str, &str)] = &[
    ("awsguardduty.yaml", include_str!("../catalog/awsguardduty.yaml")),
    ("cybereason.yaml", include_str!("../catalog/cybereason.yaml")),
    ("freshworksfreshservice.yaml", include_str!("../catalog/freshworksfreshservice.yaml")),
    ("gsuite.yaml", include_str!("../catalog/gsuite.yaml")),
    ("microsoftazuresentinel.yaml", include_str!("../catalog/microsoftazuresentinel.yaml")),
    ("threatq.yaml", include_str!("../catalog/threatq.yaml")),
    ("virustotalv3.yaml", include_str!("../catalog/virustotalv3.yaml")),
];

/// Serialization format of a manifest document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse and validate a single manifest document.
///
/// `origin` names the document in error messages.
pub fn parse_manifest(source: &str, origin: &str, format: ManifestFormat) -> Result<IntegrationManifest, RegistryError> {
    let manifest: IntegrationManifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(source).map_err(|source| RegistryError::Yaml {
            origin: origin.to_string(),
            source,
        })?,
        ManifestFormat::Json => serde_json::from_str(source).map_err(|source| RegistryError::Json {
            origin: origin.to_string(),
            source,
        })?,
    };
    manifest.validate().map_err(|source| RegistryError::Manifest {
        origin: origin.to_string(),
        source,
    })?;
    Ok(manifest)
}

/// Parse every manifest compiled into the binary.
pub fn embedded_manifests() -> Result<Vec<IntegrationManifest>, RegistryError> {
    let manifests = EMBEDDED_CATALOG
        .iter()
        .map(|(file_name, source)| parse_manifest(source, file_name, ManifestFormat::Yaml))
        .collect::<Result<Vec<_>, _>>()?;
    ensure_distinct_integrations(&manifests)?;
    Ok(manifests)
}

/// Load every `.yaml`, `.yml` and `.json` manifest in `directory`, ordered by
/// file name. Other files are ignored.
pub fn load_manifest_dir(directory: &Path) -> Result<Vec<IntegrationManifest>, RegistryError> {
    let io_error = |source| RegistryError::Io {
        path: directory.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(directory).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && ManifestFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut manifests = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(format) = ManifestFormat::from_path(&path) else {
            continue;
        };
        let content = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest = parse_manifest(&content, &path.display().to_string(), format)?;
        debug!(path = %path.display(), integration = %manifest.integration, "loaded manifest from disk");
        manifests.push(manifest);
    }
    ensure_distinct_integrations(&manifests)?;
    Ok(manifests)
}

/// Combine a base catalog with overrides. An override whose integration name
/// matches a base manifest replaces it in place; others are appended.
pub fn merge_manifests(base: Vec<IntegrationManifest>, overrides: Vec<IntegrationManifest>) -> Vec<IntegrationManifest> {
    let mut merged: IndexMap<String, IntegrationManifest> = base
        .into_iter()
        .map(|manifest| (manifest.integration.clone(), manifest))
        .collect();
    for manifest in overrides {
        if merged.contains_key(&manifest.integration) {
            info!(integration = %manifest.integration, "manifest on disk replaces embedded manifest");
        }
        merged.insert(manifest.integration.clone(), manifest);
    }
    merged.into_values().collect()
}

fn ensure_distinct_integrations(manifests: &[IntegrationManifest]) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for manifest in manifests {
        if !seen.insert(manifest.integration.as_str()) {
            return Err(RegistryError::DuplicateIntegration {
                integration: manifest.integration.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTRA_MANIFEST: &str = r#"
integration: Example Vendor
actions:
- name: Ping
  description: Test connectivity.
"#;

    #[test]
    fn loads_yaml_and_json_from_directory() {
        let directory = tempfile::tempdir().expect("temp dir");
        fs::write(directory.path().join("b.yaml"), EXTRA_MANIFEST).unwrap();
        fs::write(
            directory.path().join("a.json"),
            r#"{"integration": "JsonVendor", "actions": [{"name": "Enrich IP", "parameters": [{"label": "IP", "name": "ip", "required": true}]}]}"#,
        )
        .unwrap();
        fs::write(directory.path().join("notes.txt"), "ignored").unwrap();

        let manifests = load_manifest_dir(directory.path()).expect("load directory");
        let names: Vec<_> = manifests.iter().map(|manifest| manifest.integration.as_str()).collect();
        assert_eq!(names, vec!["JsonVendor", "Example Vendor"]);
        assert_eq!(manifests[1].actions[0].tool_name("Example Vendor"), "example_vendor_ping");
    }

    #[test]
    fn rejects_invalid_manifest_with_origin() {
        let error = parse_manifest("integration: X\nactions:\n- name: A\n  bogus: 1\n", "bad.yaml", ManifestFormat::Yaml)
            .expect_err("unknown field should fail");
        assert!(error.to_string().contains("bad.yaml"), "{error}");
    }

    #[test]
    fn rejects_duplicate_integrations_in_one_directory() {
        let directory = tempfile::tempdir().expect("temp dir");
        fs::write(directory.path().join("one.yaml"), EXTRA_MANIFEST).unwrap();
        fs::write(directory.path().join("two.yml"), EXTRA_MANIFEST).unwrap();
        assert!(matches!(
            load_manifest_dir(directory.path()),
            Err(RegistryError::DuplicateIntegration { .. })
        ));
    }

    #[test]
    fn overrides_replace_embedded_manifests_in_place() {
        let base = embedded_manifests().expect("embedded");
        let first = base[0].integration.clone();
        let replacement = IntegrationManifest {
            integration: first.clone(),
            description: Some("patched".into()),
            actions: Vec::new(),
        };
        let extra = parse_manifest(EXTRA_MANIFEST, "extra", ManifestFormat::Yaml).unwrap();
        let base_len = base.len();

        let merged = merge_manifests(base, vec![replacement, extra]);
        assert_eq!(merged.len(), base_len + 1);
        assert_eq!(merged[0].integration, first);
        assert_eq!(merged[0].description.as_deref(), Some("patched"));
        assert_eq!(merged.last().map(|manifest| manifest.integration.as_str()), Some("Example Vendor"));
    }

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("a.YML")), Some(ManifestFormat::Yaml));
        assert_eq!(ManifestFormat::from_path(Path::new("a.json")), Some(ManifestFormat::Json));
        assert_eq!(ManifestFormat::from_path(Path::new("a.toml")), None);
    }
}
