//! Manual action assembly and dispatch.

use std::sync::Arc;

use serde_json::Value;
use soar_api::{SoarBackend, endpoints};
use soar_registry::MarketplaceAction;
use soar_types::{ACTION_PROVIDER_SCRIPTS, ActionProperties, ManualActionRequest};
use tracing::{debug, warn};

use crate::action::arguments::ActionArguments;
use crate::action::instance::{InstancePolicy, locate_instance};
use crate::action::scope::{ActionTarget, ScopeSet, resolve_target};
use crate::action::ActionError;

/// Runs marketplace actions against the backend.
///
/// Shared state is read-only; every invocation performs its own instance
/// lookup and dispatch.
#[derive(Debug, Clone)]
pub struct ActionInvoker {
    backend: Arc<dyn SoarBackend>,
    scopes: Arc<ScopeSet>,
    instances: Arc<InstancePolicy>,
}

impl ActionInvoker {
    pub fn new(backend: Arc<dyn SoarBackend>, scopes: ScopeSet, instances: InstancePolicy) -> Self {
        Self {
            backend,
            scopes: Arc::new(scopes),
            instances: Arc::new(instances),
        }
    }

    /// Run `action` and return the backend response, or a failure record.
    pub async fn invoke(&self, action: &MarketplaceAction, arguments: ActionArguments) -> Value {
        match self.try_invoke(action, arguments).await {
            Ok(response) => response,
            Err(error) => {
                warn!(tool = %action.tool_name, %error, "marketplace action failed");
                error.into_failure()
            }
        }
    }

    async fn try_invoke(&self, action: &MarketplaceAction, arguments: ActionArguments) -> Result<Value, ActionError> {
        let ActionArguments {
            case_id,
            alert_group_identifiers,
            target_entities,
            scope,
            parameters,
        } = arguments;

        let target = resolve_target(target_entities, &scope, &self.scopes)?;
        let selection = self.instances.selection_for(&action.integration);
        let instance = locate_instance(self.backend.as_ref(), &action.integration, &selection).await?;

        let properties = ActionProperties::new(instance, action.script_name.clone(), &parameters).map_err(ActionError::Encoding)?;
        let request = build_request(action, case_id, alert_group_identifiers, &target, properties);
        dispatch(self.backend.as_ref(), &request).await
    }
}

/// Assemble the request envelope for one invocation.
pub fn build_request(
    action: &MarketplaceAction,
    case_id: i64,
    alert_group_identifiers: Vec<String>,
    target: &ActionTarget,
    properties: ActionProperties,
) -> ManualActionRequest {
    ManualActionRequest {
        case_id,
        target_entities: target.target_entities(),
        properties,
        action_provider: ACTION_PROVIDER_SCRIPTS.to_string(),
        action_name: action.script_name.clone(),
        scope: target.scope().map(str::to_string),
        alert_group_identifiers,
        is_predefined_scope: target.is_predefined_scope(),
    }
}

/// POST the request to the execute-manual-action endpoint and return the
/// response body unmodified.
pub async fn dispatch(backend: &dyn SoarBackend, request: &ManualActionRequest) -> Result<Value, ActionError> {
    let body = serde_json::to_value(request).map_err(ActionError::Encoding)?;
    debug!(action = %request.action_name, case_id = request.case_id, "executing manual action");
    backend
        .post_json(endpoints::EXECUTE_MANUAL_ACTION, &body)
        .await
        .map_err(ActionError::Execution)
}
