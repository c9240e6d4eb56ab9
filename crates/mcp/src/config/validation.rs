//! Configuration validation.

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::SoarConfig;

/// Validate the entire configuration.
pub fn validate_config(config: &SoarConfig) -> Result<(), ValidationError> {
    validate_soar_url(config.soar_url.as_deref())?;

    for (integration, identifier) in &config.instances {
        validate_instance_override(integration, identifier)?;
        debug!("Validated instance override for integration: {}", integration);
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ValidationError::InvalidTimeout);
    }

    Ok(())
}

/// Validate the SOAR base URL.
fn validate_soar_url(soar_url: Option<&str>) -> Result<(), ValidationError> {
    let Some(raw) = soar_url.map(str::trim).filter(|value| !value.is_empty()) else {
        return Err(ValidationError::MissingRequiredField {
            field: "soarUrl".to_string(),
            fallback: "SOAR_URL".to_string(),
        });
    };

    let url = Url::parse(raw).map_err(|error| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: error.to_string(),
    })?;

    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("Unsupported URL scheme: {} (expected http/https)", scheme),
        });
    }

    if url.host_str().is_none() {
        return Err(ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL must include a host".to_string(),
        });
    }

    Ok(())
}

/// Validate one entry of the `instances` map.
fn validate_instance_override(integration: &str, identifier: &str) -> Result<(), ValidationError> {
    if integration.trim().is_empty() {
        return Err(ValidationError::InvalidInstanceOverride {
            integration: integration.to_string(),
            reason: "Integration name cannot be empty".to_string(),
        });
    }

    if identifier.trim().is_empty() {
        return Err(ValidationError::InvalidInstanceOverride {
            integration: integration.to_string(),
            reason: "Instance identifier cannot be empty".to_string(),
        });
    }

    Ok(())
}

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field '{field}' (set it in the config file or the {fallback} environment variable)")]
    MissingRequiredField { field: String, fallback: String },

    #[error("Invalid SOAR URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid instance override for '{integration}': {reason}")]
    InvalidInstanceOverride { integration: String, reason: String },

    #[error("requestTimeoutSecs must be greater than zero")]
    InvalidTimeout,
}
