//! Data models for the SOAR MCP configuration.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{InterpolationError, ValidationError};

/// Default request timeout applied to every backend call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SoarConfig {
    /// Base URL of the SOAR platform, e.g. `https://tenant.siemplify-soar.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soar_url: Option<String>,

    /// Application key sent as the `AppKey` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,

    /// Marketplace integrations to expose as tools. Matched after removing
    /// spaces and `/` and lowercasing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub integrations: Vec<String>,

    /// Preferred integration instance identifier per integration name. When
    /// absent for an integration the first instance the backend lists is used.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub instances: IndexMap<String, String>,

    /// Directory with additional integration manifests (YAML or JSON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_dir: Option<String>,

    /// Per-request timeout for backend calls, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl SoarConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
