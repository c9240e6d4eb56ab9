//! Marketplace integration catalog model.
//!
//! A manifest describes one vendor integration and the actions it exposes.
//! Each action becomes one MCP tool; its parameters become the tool's
//! vendor-specific arguments and, at dispatch time, the entries of the
//! script parameter bag keyed by their display label.

use std::collections::HashSet;

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Argument names every marketplace tool carries in addition to its own
/// parameters. Manifest parameters may not reuse them.
pub const RESERVED_ARGUMENT_NAMES: &[&str] = &["case_id", "alert_group_identifiers", "target_entities", "scope"];

/// One vendor integration and its catalog of actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntegrationManifest {
    /// Integration name exactly as the SOAR backend knows it (e.g. `AWSGuardDuty`).
    pub integration: String,
    /// Optional human-readable summary of the integration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Actions exposed as tools, in registration order.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl IntegrationManifest {
    /// Check the structural rules every manifest must satisfy before its
    /// actions can be registered.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.integration.trim().is_empty() {
            return Err(ManifestError::EmptyIntegrationName);
        }

        let mut seen_actions = HashSet::new();
        for action in &self.actions {
            if action.name.trim().is_empty() {
                return Err(ManifestError::EmptyActionName {
                    integration: self.integration.clone(),
                });
            }
            if !seen_actions.insert(action.name.as_str()) {
                return Err(ManifestError::DuplicateAction {
                    integration: self.integration.clone(),
                    action: action.name.clone(),
                });
            }
            action.validate(&self.integration)?;
        }
        Ok(())
    }
}

/// A single vendor action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    /// Display name of the action as registered in the SOAR marketplace.
    pub name: String,
    /// MCP tool name. Derived from the integration and action name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Tool description shown to MCP clients.
    #[serde(default)]
    pub description: String,
    /// Vendor-specific parameters in the order they are sent to the backend.
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

impl ActionSpec {
    /// Backend script identifier: `"<Integration>_<Action display name>"`.
    ///
    /// The backend resolves the action by this exact string, so spacing and
    /// casing of the display name are preserved.
    pub fn script_name(&self, integration: &str) -> String {
        format!("{integration}_{}", self.name)
    }

    /// MCP tool name for this action.
    pub fn tool_name(&self, integration: &str) -> String {
        match &self.tool {
            Some(tool) if !tool.trim().is_empty() => tool.clone(),
            _ => format!("{integration} {}", self.name).to_snake_case(),
        }
    }

    fn validate(&self, integration: &str) -> Result<(), ManifestError> {
        let mut names = HashSet::new();
        let mut labels = HashSet::new();
        for parameter in &self.parameters {
            if RESERVED_ARGUMENT_NAMES.contains(&parameter.name.as_str()) {
                return Err(ManifestError::ReservedParameter {
                    action: self.script_name(integration),
                    name: parameter.name.clone(),
                });
            }
            if !names.insert(parameter.name.as_str()) {
                return Err(ManifestError::DuplicateParameter {
                    action: self.script_name(integration),
                    name: parameter.name.clone(),
                });
            }
            if !labels.insert(parameter.label.as_str()) {
                return Err(ManifestError::DuplicateLabel {
                    action: self.script_name(integration),
                    label: parameter.label.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A vendor-specific action parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActionParameter {
    /// Display label used as the key in the script parameter bag.
    pub label: String,
    /// Argument name exposed on the MCP tool.
    pub name: String,
    /// Accepted JSON value shape.
    #[serde(rename = "type", default)]
    pub kind: ParameterKind,
    /// Whether the caller must supply a value.
    #[serde(default)]
    pub required: bool,
    /// Argument description shown to MCP clients.
    #[serde(default)]
    pub description: String,
}

impl ActionParameter {
    /// JSON schema fragment describing this parameter on the tool input schema.
    pub fn json_schema(&self) -> Value {
        let mut schema = self.kind.json_schema();
        if let Some(object) = schema.as_object_mut() {
            if !self.description.is_empty() {
                object.insert("description".into(), Value::String(self.description.clone()));
            }
            if !self.required {
                object.insert("default".into(), Value::Null);
            }
        }
        schema
    }
}

/// Value shapes a vendor parameter accepts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    #[default]
    String,
    Boolean,
    Integer,
    Number,
    List,
    /// Either a JSON string or a JSON object, passed through unchanged.
    Json,
}

impl ParameterKind {
    /// JSON schema fragment for the value shape.
    pub fn json_schema(self) -> Value {
        match self {
            ParameterKind::String => json!({ "type": "string" }),
            ParameterKind::Boolean => json!({ "type": "boolean" }),
            ParameterKind::Integer => json!({ "type": "integer" }),
            ParameterKind::Number => json!({ "type": "number" }),
            ParameterKind::List => json!({ "type": "array", "items": {} }),
            ParameterKind::Json => json!({ "anyOf": [{ "type": "string" }, { "type": "object" }] }),
        }
    }

    /// Whether a provided (non-null) value matches this shape.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParameterKind::String => value.is_string(),
            ParameterKind::Boolean => value.is_boolean(),
            ParameterKind::Integer => value.is_i64() || value.is_u64(),
            ParameterKind::Number => value.is_number(),
            ParameterKind::List => value.is_array(),
            ParameterKind::Json => value.is_string() || value.is_object(),
        }
    }

    /// Short name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Integer => "integer",
            ParameterKind::Number => "number",
            ParameterKind::List => "list",
            ParameterKind::Json => "json",
        }
    }
}

/// Structural problems in an integration manifest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("integration name cannot be empty")]
    EmptyIntegrationName,

    #[error("integration '{integration}' declares an action without a name")]
    EmptyActionName { integration: String },

    #[error("integration '{integration}' declares action '{action}' more than once")]
    DuplicateAction { integration: String, action: String },

    #[error("action '{action}' declares parameter '{name}' more than once")]
    DuplicateParameter { action: String, name: String },

    #[error("action '{action}' declares label '{label}' more than once")]
    DuplicateLabel { action: String, label: String },

    #[error("action '{action}' cannot declare parameter '{name}'; the name is reserved for every marketplace tool")]
    ReservedParameter { action: String, name: String },
}
