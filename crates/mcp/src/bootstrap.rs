//! Startup wiring: backend client, valid scopes, integration catalog and
//! instance policy, plus the stdio transport.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use rmcp::ServiceExt;
use soar_api::{SoarBackend, SoarClient, fetch_valid_scopes};
use soar_registry::{
    IntegrationRegistry, IntegrationSelection, RegistryError, embedded_manifests, load_manifest_dir, merge_manifests,
};
use soar_util::expand_tilde;
use tracing::{error, info};

use crate::action::{InstancePolicy, ScopeSet};
use crate::config::SoarConfig;
use crate::server::{McpToolServices, SoarMcpCore};

/// Reported when the scope list cannot be fetched; the server does not start.
pub const SCOPES_UNAVAILABLE: &str =
    "Failed to fetch valid scopes from SOAR, please make sure you have configured the right SOAR credentials. Shutting down...";

/// Embedded catalog merged with the configured manifest directory, filtered to
/// the configured integrations.
pub fn build_registry(config: &SoarConfig) -> Result<IntegrationRegistry, RegistryError> {
    let mut manifests = embedded_manifests()?;
    if let Some(directory) = config.manifest_dir.as_deref() {
        let overrides = load_manifest_dir(&expand_tilde(directory))?;
        manifests = merge_manifests(manifests, overrides);
    }
    IntegrationRegistry::from_manifests(manifests, &IntegrationSelection::from_names(&config.integrations))
}

pub fn instance_policy(config: &SoarConfig) -> InstancePolicy {
    InstancePolicy::with_overrides(config.instances.iter())
}

/// Connect to the configured SOAR platform and prepare the tool services.
pub async fn build_services(config: &SoarConfig) -> Result<McpToolServices> {
    let soar_url = config
        .soar_url
        .as_deref()
        .ok_or_else(|| anyhow!("soarUrl is not configured"))?;
    let client = SoarClient::new(soar_url, config.app_key.as_deref(), config.request_timeout())?;
    build_services_with_backend(Arc::new(client), config).await
}

/// Prepare the tool services over an existing backend.
pub async fn build_services_with_backend(backend: Arc<dyn SoarBackend>, config: &SoarConfig) -> Result<McpToolServices> {
    let scopes = fetch_valid_scopes(backend.as_ref())
        .await
        .inspect_err(|error| error!(%error, "scope lookup failed"))
        .context(SCOPES_UNAVAILABLE)?;
    let registry = build_registry(config)?;
    info!(
        scopes = scopes.len(),
        integrations = registry.integrations().len(),
        tools = registry.len(),
        "registered marketplace actions"
    );
    let services = McpToolServices::new(backend, registry, ScopeSet::from(scopes), instance_policy(config))?;
    Ok(services)
}

/// Serve over stdin/stdout until the peer disconnects.
pub async fn serve_stdio(services: Arc<McpToolServices>) -> Result<()> {
    let service = SoarMcpCore::new(services)
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|error| error!(%error, "failed to start stdio transport"))?;
    service.waiting().await?;
    Ok(())
}
