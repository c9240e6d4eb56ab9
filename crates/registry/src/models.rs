use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;
use soar_types::{ActionSpec, IntegrationManifest};
use soar_util::normalize_integration_name;
use tracing::{debug, warn};

use crate::error::RegistryError;

/// Which integrations get their actions registered as tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationSelection {
    /// Every integration in the catalog.
    All,
    /// Only integrations whose normalized name is in the set. An empty set
    /// enables nothing.
    Named(BTreeSet<String>),
}

impl IntegrationSelection {
    /// Build a selection from raw names; each is normalized before matching.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Named(
            names
                .into_iter()
                .map(|name| normalize_integration_name(name.as_ref()))
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }

    pub fn includes(&self, integration: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(names) => names.contains(&normalize_integration_name(integration)),
        }
    }
}

/// A catalog action bound to its integration, ready to be exposed as a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceAction {
    /// Integration name as the backend knows it.
    pub integration: String,
    /// MCP tool name.
    pub tool_name: String,
    /// `"<Integration>_<Action display name>"`, used as both `actionName` and `ScriptName`.
    pub script_name: String,
    pub spec: ActionSpec,
}

impl MarketplaceAction {
    fn new(integration: &str, spec: ActionSpec) -> Self {
        Self {
            integration: integration.to_string(),
            tool_name: spec.tool_name(integration),
            script_name: spec.script_name(integration),
            spec,
        }
    }
}

/// Enabled marketplace actions indexed by tool name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct IntegrationRegistry {
    actions: IndexMap<String, Arc<MarketplaceAction>>,
    integrations: Vec<String>,
}

impl IntegrationRegistry {
    /// Index the actions of every selected manifest.
    ///
    /// Requested names that match no manifest are logged and skipped. Two
    /// enabled actions resolving to the same tool name are rejected.
    pub fn from_manifests<I>(manifests: I, selection: &IntegrationSelection) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = IntegrationManifest>,
    {
        let mut registry = Self::default();
        let mut owners: HashMap<String, String> = HashMap::new();
        let mut matched = BTreeSet::new();

        for manifest in manifests {
            if !selection.includes(&manifest.integration) {
                debug!(integration = %manifest.integration, "integration not enabled");
                continue;
            }
            matched.insert(normalize_integration_name(&manifest.integration));

            let IntegrationManifest { integration, actions, .. } = manifest;
            for spec in actions {
                let action = MarketplaceAction::new(&integration, spec);
                if let Some(first) = owners.get(&action.tool_name) {
                    return Err(RegistryError::DuplicateTool {
                        tool: action.tool_name.clone(),
                        first: first.clone(),
                        second: action.script_name.clone(),
                    });
                }
                owners.insert(action.tool_name.clone(), action.script_name.clone());
                registry.actions.insert(action.tool_name.clone(), Arc::new(action));
            }
            debug!(%integration, "integration enabled");
            registry.integrations.push(integration);
        }

        if let IntegrationSelection::Named(requested) = selection {
            for unknown in requested.difference(&matched) {
                warn!(integration = %unknown, "requested integration is not in the catalog");
            }
        }

        Ok(registry)
    }

    pub fn get(&self, tool_name: &str) -> Option<&Arc<MarketplaceAction>> {
        self.actions.get(tool_name)
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.actions.contains_key(tool_name)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Arc<MarketplaceAction>> {
        self.actions.values()
    }

    /// Names of the enabled integrations, in catalog order.
    pub fn integrations(&self) -> &[String] {
        &self.integrations
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
