//! Marketplace action invocation: scope resolution, instance lookup, and
//! dispatch of the manual action request.

mod arguments;
mod dispatcher;
mod error;
mod instance;
mod scope;

pub use arguments::{ALERT_GROUP_IDENTIFIERS, ActionArguments, CASE_ID, SCOPE, TARGET_ENTITIES, bind_arguments};
pub use dispatcher::{ActionInvoker, build_request, dispatch};
pub use error::{ActionError, ArgumentError};
pub use instance::{InstancePolicy, InstanceSelection, locate_instance};
pub use scope::{ActionTarget, DEFAULT_SCOPE, ScopeSet, resolve_target};
