use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use soar_mcp::config::{SoarConfig, load_config, load_config_from_path};
use soar_mcp::{build_services, serve_stdio};
use soar_util::parse_name_list;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MCP server exposing SecOps SOAR case management and marketplace actions.
#[derive(Debug, Parser)]
#[command(name = "secops-soar-mcp", version, about)]
struct Args {
    /// Comma-separated marketplace integrations to expose as tools.
    #[arg(long, value_name = "LIST")]
    integrations: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    verbose: bool,

    /// Configuration file; defaults to ~/.config/secops-soar/soar.json.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Preferred instance identifier for an integration, as NAME=ID. Repeatable.
    #[arg(long = "instance", value_name = "NAME=ID", value_parser = parse_instance_override)]
    instances: Vec<(String, String)>,
}

impl Args {
    /// Command-line values take precedence over the configuration file.
    fn apply_to(&self, config: &mut SoarConfig) {
        if let Some(integrations) = &self.integrations {
            config.integrations = parse_name_list(integrations);
        }
        for (integration, identifier) in &self.instances {
            config.instances.insert(integration.clone(), identifier.clone());
        }
    }
}

fn parse_instance_override(raw: &str) -> Result<(String, String), String> {
    let (integration, identifier) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=ID, got '{raw}'"))?;
    let (integration, identifier) = (integration.trim(), identifier.trim());
    if integration.is_empty() || identifier.is_empty() {
        return Err(format!("expected NAME=ID, got '{raw}'"));
    }
    Ok((integration.to_string(), identifier.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => load_config_from_path(path).with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => load_config().context("failed to load configuration")?,
    };
    args.apply_to(&mut config);

    let services = Arc::new(build_services(&config).await?);
    info!(
        integrations = services.registry().integrations().len(),
        "starting SecOps SOAR MCP server on stdio"
    );
    serve_stdio(services).await
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_applies_overrides() {
        let args = Args::try_parse_from([
            "secops-soar-mcp",
            "--integrations",
            "AWS GuardDuty, VirusTotalV3",
            "--instance",
            "AWSGuardDuty=inst-2",
        ])
        .unwrap();

        let mut config = SoarConfig::default();
        config.integrations = vec!["gsuite".into()];
        args.apply_to(&mut config);
        assert_eq!(config.integrations, vec!["awsguardduty".to_string(), "virustotalv3".to_string()]);
        assert_eq!(config.instances.get("AWSGuardDuty").map(String::as_str), Some("inst-2"));
    }

    #[test]
    fn keeps_config_values_without_flags() {
        let args = Args::try_parse_from(["secops-soar-mcp"]).unwrap();
        assert!(!args.verbose);

        let mut config = SoarConfig::default();
        config.integrations = vec!["gsuite".into()];
        args.apply_to(&mut config);
        assert_eq!(config.integrations, vec!["gsuite".to_string()]);
    }

    #[test]
    fn rejects_malformed_instance_override() {
        assert!(parse_instance_override("AWSGuardDuty").is_err());
        assert!(parse_instance_override("=inst").is_err());
        assert_eq!(
            parse_instance_override(" GSuite = inst-1 ").unwrap(),
            ("GSuite".to_string(), "inst-1".to_string())
        );
    }
}
