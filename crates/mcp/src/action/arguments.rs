//! Binding raw tool arguments to a catalog action.

use serde_json::{Map, Value};
use soar_types::{ActionSpec, ScriptParameters, TargetEntity};
use tracing::debug;

use crate::action::ArgumentError;
use crate::action::scope::DEFAULT_SCOPE;

/// Cross-cutting arguments shared by every marketplace tool.
pub const CASE_ID: &str = "case_id";
pub const ALERT_GROUP_IDENTIFIERS: &str = "alert_group_identifiers";
pub const TARGET_ENTITIES: &str = "target_entities";
pub const SCOPE: &str = "scope";

/// Validated arguments of one marketplace tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionArguments {
    pub case_id: i64,
    pub alert_group_identifiers: Vec<String>,
    pub target_entities: Vec<TargetEntity>,
    pub scope: String,
    /// Vendor parameters keyed by display label, in manifest order.
    pub parameters: ScriptParameters,
}

/// Validate `arguments` against `spec`.
///
/// Absent or `null` optional parameters are left out of the parameter bag;
/// required parameters are always present, even when empty.
pub fn bind_arguments(spec: &ActionSpec, arguments: Option<&Map<String, Value>>) -> Result<ActionArguments, ArgumentError> {
    let empty = Map::new();
    let arguments = arguments.unwrap_or(&empty);

    let case_id = parse_case_id(provided(arguments, CASE_ID).ok_or_else(|| ArgumentError::Missing(CASE_ID.into()))?)?;
    let alert_group_identifiers = parse_string_list(
        ALERT_GROUP_IDENTIFIERS,
        provided(arguments, ALERT_GROUP_IDENTIFIERS).ok_or_else(|| ArgumentError::Missing(ALERT_GROUP_IDENTIFIERS.into()))?,
    )?;
    let target_entities = match provided(arguments, TARGET_ENTITIES) {
        Some(value) => serde_json::from_value(value.clone()).map_err(|_| ArgumentError::WrongType {
            name: TARGET_ENTITIES.into(),
            expected: "an array of {Identifier, EntityType} objects".into(),
        })?,
        None => Vec::new(),
    };
    let scope = match provided(arguments, SCOPE) {
        Some(Value::String(scope)) => scope.clone(),
        Some(_) => {
            return Err(ArgumentError::WrongType {
                name: SCOPE.into(),
                expected: "a string".into(),
            });
        }
        None => DEFAULT_SCOPE.to_string(),
    };

    let mut parameters = ScriptParameters::new();
    for parameter in &spec.parameters {
        let Some(value) = provided(arguments, &parameter.name) else {
            if parameter.required {
                return Err(ArgumentError::Missing(parameter.name.clone()));
            }
            continue;
        };
        if !parameter.kind.accepts(value) {
            return Err(ArgumentError::WrongType {
                name: parameter.name.clone(),
                expected: format!("of type {}", parameter.kind.as_str()),
            });
        }
        parameters.insert(parameter.label.clone(), value.clone());
    }

    for name in arguments.keys() {
        let known = [CASE_ID, ALERT_GROUP_IDENTIFIERS, TARGET_ENTITIES, SCOPE].contains(&name.as_str())
            || spec.parameters.iter().any(|parameter| &parameter.name == name);
        if !known {
            debug!(argument = %name, action = %spec.name, "ignoring unknown argument");
        }
    }

    Ok(ActionArguments {
        case_id,
        alert_group_identifiers,
        target_entities,
        scope,
        parameters,
    })
}

/// A non-null argument value.
fn provided<'a>(arguments: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    arguments.get(name).filter(|value| !value.is_null())
}

fn parse_case_id(value: &Value) -> Result<i64, ArgumentError> {
    match value {
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ArgumentError::InvalidCaseId(text.clone())),
        Value::Number(number) => number.as_i64().ok_or_else(|| ArgumentError::InvalidCaseId(number.to_string())),
        other => Err(ArgumentError::InvalidCaseId(other.to_string())),
    }
}

fn parse_string_list(name: &str, value: &Value) -> Result<Vec<String>, ArgumentError> {
    let wrong_type = || ArgumentError::WrongType {
        name: name.to_string(),
        expected: "an array of strings".into(),
    };
    value
        .as_array()
        .ok_or_else(wrong_type)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong_type))
        .collect()
}
