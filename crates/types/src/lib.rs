//! Shared types for the SecOps SOAR MCP server.
//!
//! This crate holds the data that crosses crate boundaries:
//!
//! - the marketplace catalog model ([`IntegrationManifest`], [`ActionSpec`],
//!   [`ActionParameter`]) loaded by the registry
//! - the manual action request envelope sent to the SOAR backend
//!   ([`ManualActionRequest`] and friends)
//! - the uniform failure record returned by every vendor action
//! - case-management enums shared by tool schemas and request bodies

mod action;
mod case;
mod manifest;
pub mod python_json;

pub use action::{
    ACTION_PROVIDER_SCRIPTS, ActionProperties, FAILED_STATUS, FailureRecord, ManualActionRequest, ScriptParameters, TargetEntity,
    failure_value,
};
pub use case::CasePriority;
pub use manifest::{ActionParameter, ActionSpec, IntegrationManifest, ManifestError, ParameterKind, RESERVED_ARGUMENT_NAMES};
