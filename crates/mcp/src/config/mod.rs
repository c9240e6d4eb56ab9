//! Configuration management for the SOAR MCP server.
//! This module handles parsing, environment fallbacks, interpolation, and
//! validation of the ~/.config/secops-soar/soar.json configuration file.

mod interpolation;
mod io;
mod model;
mod validation;

pub use interpolation::{InterpolationError, interpolate_config};
pub use io::{CONFIG_PATH_ENV, SOAR_APP_KEY_ENV, SOAR_URL_ENV, apply_environment_defaults, default_config_path, load_config, load_config_from_path};
pub use model::{ConfigError, SoarConfig};
pub use validation::{ValidationError, validate_config};
