//! Manual action request envelope and the uniform failure record.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::python_json;

/// Provider value the backend expects for marketplace script actions.
pub const ACTION_PROVIDER_SCRIPTS: &str = "Scripts";

/// The only status value a locally produced failure record carries.
pub const FAILED_STATUS: &str = "Failed";

/// An entity an action runs against.
///
/// Serialized with the backend's capitalized keys; input also accepts the
/// camel-case spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetEntity {
    /// Entity identifier, e.g. an IP address or host name.
    #[serde(rename = "Identifier", alias = "identifier")]
    pub identifier: String,
    /// Entity type, e.g. `ADDRESS` or `HOSTNAME`.
    #[serde(rename = "EntityType", alias = "entityType")]
    pub entity_type: String,
}

/// Ordered mapping of parameter display label to the caller-supplied value.
///
/// Only encoded to text at the dispatch boundary, see [`ActionProperties::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScriptParameters(IndexMap<String, Value>);

impl ScriptParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: Value) {
        self.0.insert(label.into(), value);
    }

    /// Encode as the JSON text the script runner decodes.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        python_json::to_string(&self.0)
    }
}

/// The `properties` object of a manual action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionProperties {
    #[serde(rename = "IntegrationInstance")]
    pub integration_instance: String,
    #[serde(rename = "ScriptName")]
    pub script_name: String,
    /// JSON-encoded [`ScriptParameters`].
    #[serde(rename = "ScriptParametersEntityFields")]
    pub script_parameters_entity_fields: String,
}

impl ActionProperties {
    pub fn new(
        integration_instance: impl Into<String>,
        script_name: impl Into<String>,
        parameters: &ScriptParameters,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            integration_instance: integration_instance.into(),
            script_name: script_name.into(),
            script_parameters_entity_fields: parameters.to_json_string()?,
        })
    }
}

/// Body of `POST /api/external/v1/cases/ExecuteManualAction`.
///
/// Field order matches what the backend has always received. Exactly one of
/// a non-empty `target_entities` or (`scope` set and `is_predefined_scope`)
/// holds for requests built by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualActionRequest {
    pub case_id: i64,
    pub target_entities: Vec<TargetEntity>,
    pub properties: ActionProperties,
    pub action_provider: String,
    pub action_name: String,
    pub scope: Option<String>,
    pub alert_group_identifiers: Vec<String>,
    pub is_predefined_scope: bool,
}

/// `{"Status": "Failed", "Message": ...}` returned in place of a backend response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl FailureRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: FAILED_STATUS.to_string(),
            message: message.into(),
        }
    }

    pub fn into_value(self) -> Value {
        let mut object = serde_json::Map::with_capacity(2);
        object.insert("Status".into(), Value::String(self.status));
        object.insert("Message".into(), Value::String(self.message));
        Value::Object(object)
    }
}

/// Shorthand for `FailureRecord::new(message).into_value()`.
pub fn failure_value(message: impl Into<String>) -> Value {
    FailureRecord::new(message).into_value()
}
