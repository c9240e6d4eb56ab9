use std::path::PathBuf;

use soar_types::ManifestError;
use thiserror::Error;

/// Errors raised while loading or indexing integration manifests.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read manifest '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML manifest '{origin}': {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON manifest '{origin}': {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest '{origin}': {source}")]
    Manifest {
        origin: String,
        #[source]
        source: ManifestError,
    },

    #[error("integration '{integration}' is declared by more than one manifest")]
    DuplicateIntegration { integration: String },

    #[error("tool '{tool}' is declared by both '{first}' and '{second}'")]
    DuplicateTool { tool: String, first: String, second: String },
}
