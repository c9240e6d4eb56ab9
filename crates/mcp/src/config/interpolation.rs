//! Configuration interpolation for environment variables and secrets.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

use crate::config::SoarConfig;

static SERVICE: &str = "secops-soar";

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(env|secret):([\w.+-]*)}").expect("placeholder regex should compile"));

/// Interpolate `${env:NAME}` and `${secret:NAME}` placeholders in every
/// string-valued setting.
pub fn interpolate_config(config: &mut SoarConfig) -> Result<(), InterpolationError> {
    interpolate_optional(&mut config.soar_url)?;
    interpolate_optional(&mut config.app_key)?;
    interpolate_optional(&mut config.manifest_dir)?;
    for (integration, identifier) in config.instances.iter_mut() {
        *identifier = interpolate_string(identifier)?;
        debug!("Interpolated instance override for integration: {}", integration);
    }
    Ok(())
}

fn interpolate_optional(value: &mut Option<String>) -> Result<(), InterpolationError> {
    if let Some(inner) = value.as_mut() {
        *inner = interpolate_string(inner)?;
    }
    Ok(())
}

/// Interpolate a string value, replacing ${env:NAME} and ${secret:NAME} patterns.
pub(crate) fn interpolate_string(value: &str) -> Result<String, InterpolationError> {
    let mut failure = None;
    let replaced = PLACEHOLDER_REGEX.replace_all(value, |caps: &Captures| {
        let name = &caps[2];
        let resolved = match &caps[1] {
            "env" => std::env::var(name).map_err(|_| InterpolationError::MissingEnvVar { name: name.to_string() }),
            _ => resolve_secret(name),
        };
        match resolved {
            Ok(resolved) => {
                debug!("Interpolated {}: {} -> [REDACTED]", &caps[1], name);
                resolved
            }
            Err(error) => {
                failure.get_or_insert(error);
                String::new()
            }
        }
    });

    match failure {
        Some(error) => Err(error),
        None => Ok(replaced.into_owned()),
    }
}

/// Resolve a secret from the OS keychain.
fn resolve_secret(name: &str) -> Result<String, InterpolationError> {
    let keyring = keyring::Entry::new(SERVICE, name).map_err(|e| InterpolationError::KeyringError {
        name: name.to_string(),
        error: e.to_string(),
    })?;

    keyring.get_password().map_err(|e| InterpolationError::MissingSecret {
        name: name.to_string(),
        error: e.to_string(),
    })
}

/// Errors that can occur during interpolation.
#[derive(Debug, Error, Clone)]
pub enum InterpolationError {
    #[error("Missing environment variable: {name}")]
    MissingEnvVar { name: String },

    #[error("Missing secret: {name} - {error}")]
    MissingSecret { name: String, error: String },

    #[error("Keyring error for {name}: {error}")]
    KeyringError { name: String, error: String },
}
