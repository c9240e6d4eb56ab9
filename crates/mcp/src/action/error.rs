use soar_api::ApiError;
use soar_types::failure_value;
use serde_json::Value;
use thiserror::Error;

/// Reasons a marketplace action invocation ends in a failure record.
///
/// `Display` yields the exact `Message` text callers receive.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid scope '{scope}'. Allowed values are: {allowed}")]
    InvalidScope { scope: String, allowed: String },

    #[error("Error fetching instance: {0}")]
    InstanceLookup(#[source] ApiError),

    #[error("No active instance found.")]
    NoActiveInstance,

    #[error("Instance found but identifier is missing.")]
    MissingIdentifier,

    #[error("Configured instance '{0}' not found.")]
    ConfiguredInstanceNotFound(String),

    #[error("Error executing action: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("Error executing action: {0}")]
    Execution(#[source] ApiError),
}

impl ActionError {
    /// Convert into the `{"Status": "Failed", "Message": ...}` record.
    pub fn into_failure(self) -> Value {
        failure_value(self.to_string())
    }
}

/// Malformed tool arguments, reported to the MCP client as `invalid_params`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("missing required argument '{0}'")]
    Missing(String),

    #[error("argument '{name}' must be {expected}")]
    WrongType { name: String, expected: String },

    #[error("case_id must be an integer, got '{0}'")]
    InvalidCaseId(String),
}
