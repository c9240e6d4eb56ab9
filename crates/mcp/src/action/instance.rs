//! Integration instance lookup.

use std::collections::HashMap;

use serde_json::Value;
use soar_api::{ApiError, SoarBackend, endpoints};
use soar_util::normalize_integration_name;
use tracing::{debug, warn};

use crate::action::ActionError;

/// How to pick one instance from the backend's listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InstanceSelection {
    /// The first instance listed.
    #[default]
    First,
    /// The instance with this identifier.
    Identifier(String),
}

/// Per-integration instance selection, built from configuration.
///
/// Integrations without an override use [`InstanceSelection::First`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePolicy {
    overrides: HashMap<String, String>,
}

impl InstancePolicy {
    /// Pick the first listed instance for every integration.
    pub fn first() -> Self {
        Self::default()
    }

    /// Prefer the given identifier per integration. Integration names are
    /// matched in normalized form.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(integration, identifier)| (normalize_integration_name(integration.as_ref()), identifier.into()))
                .collect(),
        }
    }

    pub fn selection_for(&self, integration: &str) -> InstanceSelection {
        self.overrides
            .get(&normalize_integration_name(integration))
            .map(|identifier| InstanceSelection::Identifier(identifier.clone()))
            .unwrap_or_default()
    }
}

/// Fetch the integration's instances and select one identifier.
///
/// Exactly one GET is issued; nothing is cached between calls.
pub async fn locate_instance(
    backend: &dyn SoarBackend,
    integration: &str,
    selection: &InstanceSelection,
) -> Result<String, ActionError> {
    let path = endpoints::integration_instances(integration);
    let response = backend.get_json(&path, &[]).await.map_err(|error| {
        warn!(%integration, %error, "instance lookup failed");
        ActionError::InstanceLookup(error)
    })?;

    let instances = instance_list(&path, &response)?;
    if instances.is_empty() {
        warn!(%integration, "no active integration instance found");
        return Err(ActionError::NoActiveInstance);
    }

    let identifier = match selection {
        InstanceSelection::First => identifier_of(&instances[0]).ok_or(ActionError::MissingIdentifier)?,
        InstanceSelection::Identifier(wanted) => instances
            .iter()
            .filter_map(identifier_of)
            .find(|identifier| identifier == wanted)
            .ok_or_else(|| ActionError::ConfiguredInstanceNotFound(wanted.clone()))?,
    };
    debug!(%integration, instance = %identifier, "selected integration instance");
    Ok(identifier)
}

fn instance_list<'a>(path: &str, response: &'a Value) -> Result<&'a [Value], ActionError> {
    let Value::Object(object) = response else {
        return Err(ActionError::InstanceLookup(ApiError::UnexpectedShape {
            url: path.to_string(),
            reason: "expected a JSON object".to_string(),
        }));
    };
    match object.get("integration_instances") {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(instances)) => Ok(instances.as_slice()),
        Some(_) => Err(ActionError::InstanceLookup(ApiError::UnexpectedShape {
            url: path.to_string(),
            reason: "'integration_instances' is not an array".to_string(),
        })),
    }
}

fn identifier_of(instance: &Value) -> Option<String> {
    instance
        .get("identifier")
        .and_then(Value::as_str)
        .filter(|identifier| !identifier.is_empty())
        .map(str::to_string)
}
