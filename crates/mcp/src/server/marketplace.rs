//! MCP tool definitions for catalog actions.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Map, Value, json};
use soar_registry::MarketplaceAction;
use soar_types::TargetEntity;

use crate::action::{ALERT_GROUP_IDENTIFIERS, CASE_ID, DEFAULT_SCOPE, SCOPE, TARGET_ENTITIES};

/// Input schema for one action: the cross-cutting arguments around the
/// action's own parameters, in manifest order.
pub fn input_schema(action: &MarketplaceAction) -> JsonObject {
    let mut properties = Map::new();
    let mut required = vec![Value::String(CASE_ID.into()), Value::String(ALERT_GROUP_IDENTIFIERS.into())];

    properties.insert(
        CASE_ID.into(),
        json!({ "type": "string", "description": "The ID of the case." }),
    );
    properties.insert(
        ALERT_GROUP_IDENTIFIERS.into(),
        json!({
            "type": "array",
            "items": { "type": "string" },
            "description": "Identifiers for the alert groups.",
        }),
    );
    for parameter in &action.spec.parameters {
        properties.insert(parameter.name.clone(), parameter.json_schema());
        if parameter.required {
            required.push(Value::String(parameter.name.clone()));
        }
    }
    properties.insert(
        TARGET_ENTITIES.into(),
        json!({
            "type": "array",
            "items": target_entity_schema(),
            "default": [],
            "description": "Optional list of specific target entities (Identifier, EntityType) to run the action on. \
                If provided, this list is used and the scope is ignored.",
        }),
    );
    properties.insert(
        SCOPE.into(),
        json!({
            "type": "string",
            "default": DEFAULT_SCOPE,
            "description": "Defines the scope for the action when no target entities are given.",
        }),
    );

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("required".into(), Value::Array(required));
    schema
}

/// The MCP tool advertised for `action`.
pub fn tool_definition(action: &MarketplaceAction) -> Tool {
    let description = if action.spec.description.is_empty() {
        format!("Run the {} action of the {} integration.", action.spec.name, action.integration)
    } else {
        action.spec.description.clone()
    };
    Tool::new(action.tool_name.clone(), description, Arc::new(input_schema(action)))
}

fn target_entity_schema() -> Value {
    let mut schema = schemars::schema_for!(TargetEntity).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    schema
}
