//! Configuration IO helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use soar_util::expand_tilde;
use tracing::debug;

use crate::config::{ConfigError, SoarConfig, interpolate_config, validate_config};

/// Overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "SOAR_MCP_CONFIG_PATH";
/// Fallback for `soarUrl`.
pub const SOAR_URL_ENV: &str = "SOAR_URL";
/// Fallback for `appKey`.
pub const SOAR_APP_KEY_ENV: &str = "SOAR_APP_KEY";

/// Returns the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("secops-soar")
        .join("soar.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<SoarConfig, ConfigError> {
    let path = default_config_path();
    load_config_from_path(&path)
}

/// Loads configuration from a specific path.
///
/// A missing file yields the default configuration. Either way, unset
/// `soarUrl` and `appKey` fall back to the `SOAR_URL` and `SOAR_APP_KEY`
/// environment variables before interpolation and validation run.
pub fn load_config_from_path(path: &Path) -> Result<SoarConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    } else {
        debug!(path = %path.display(), "configuration file not found; using defaults");
        SoarConfig::default()
    };

    apply_environment_defaults(&mut config);
    interpolate_config(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Fill unset connection settings from the environment.
pub fn apply_environment_defaults(config: &mut SoarConfig) {
    if config.soar_url.is_none() {
        config.soar_url = non_empty_env(SOAR_URL_ENV);
    }
    if config.app_key.is_none() {
        config.app_key = non_empty_env(SOAR_APP_KEY_ENV);
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationError;

    #[test]
    fn default_path_honors_environment_override() {
        let override_path = "~/custom/soar/soar.json";
        temp_env::with_var(CONFIG_PATH_ENV, Some(override_path), || {
            let path = default_config_path();
            let expected = expand_tilde(override_path);
            assert_eq!(path, expected);
        });
    }

    #[test]
    fn missing_file_falls_back_to_environment() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("absent.json");
        temp_env::with_vars(
            [(SOAR_URL_ENV, Some("https://soar.example.com")), (SOAR_APP_KEY_ENV, Some("key-1"))],
            || {
                let config = load_config_from_path(&path).unwrap();
                assert_eq!(config.soar_url.as_deref(), Some("https://soar.example.com"));
                assert_eq!(config.app_key.as_deref(), Some("key-1"));
            },
        );
    }

    #[test]
    fn missing_url_everywhere_fails_validation() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("absent.json");
        temp_env::with_vars_unset([SOAR_URL_ENV, SOAR_APP_KEY_ENV], || {
            let error = load_config_from_path(&path).unwrap_err();
            assert!(matches!(
                error,
                ConfigError::Validation(ValidationError::MissingRequiredField { .. })
            ));
        });
    }

    #[test]
    fn file_values_win_over_environment() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("soar.json");
        fs::write(
            &path,
            r#"{"soarUrl": "https://file.example.com", "integrations": ["ThreatQ"], "instances": {"ThreatQ": "tq-1"}}"#,
        )
        .unwrap();
        temp_env::with_vars(
            [(SOAR_URL_ENV, Some("https://env.example.com")), (SOAR_APP_KEY_ENV, Some("env-key"))],
            || {
                let config = load_config_from_path(&path).unwrap();
                assert_eq!(config.soar_url.as_deref(), Some("https://file.example.com"));
                assert_eq!(config.app_key.as_deref(), Some("env-key"));
                assert_eq!(config.integrations, vec!["ThreatQ".to_string()]);
            },
        );
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("soar.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config_from_path(&path), Err(ConfigError::Json(_))));
    }
}
