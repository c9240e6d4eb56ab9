use std::sync::Arc;

use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, ErrorData as McpError, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::{RoleServer, ServerHandler, service::RequestContext, tool, tool_router};
use serde_json::Value;
use soar_api::SoarBackend;
use soar_registry::IntegrationRegistry;
use thiserror::Error;
use tracing::debug;

use crate::action::{ActionInvoker, InstancePolicy, ScopeSet, bind_arguments};
use crate::server::cases;
use crate::server::marketplace::tool_definition;
use crate::server::schemas::{
    AlertEventsRequest, AlertGroupEntitiesRequest, CaseIdRequest, CasePageRequest, ChangeCasePriorityRequest, EntityDetailsRequest,
    ListCasesRequest, PostCaseCommentRequest, SearchEntityRequest,
};

/// A marketplace tool whose name is already taken by a case-management tool.
#[derive(Debug, Error)]
#[error("marketplace tool '{0}' conflicts with the built-in tool of the same name")]
pub struct ToolNameConflict(pub String);

/// Shared, read-only state behind every tool handler.
#[derive(Debug)]
pub struct McpToolServices {
    backend: Arc<dyn SoarBackend>,
    registry: Arc<IntegrationRegistry>,
    invoker: ActionInvoker,
    marketplace_tools: Vec<Tool>,
}

impl McpToolServices {
    /// Create services over a backend, the enabled catalog actions, the valid
    /// scope names and the instance selection policy.
    ///
    /// Fails when a catalog action would shadow a case-management tool.
    pub fn new(
        backend: Arc<dyn SoarBackend>,
        registry: IntegrationRegistry,
        scopes: ScopeSet,
        instances: InstancePolicy,
    ) -> Result<Self, ToolNameConflict> {
        let builtin = SoarMcpCore::tool_router().list_all();
        if let Some(tool) = builtin.iter().find(|tool| registry.contains(tool.name.as_ref())) {
            return Err(ToolNameConflict(tool.name.to_string()));
        }
        let marketplace_tools = registry.actions().map(|action| tool_definition(action)).collect();
        Ok(Self {
            invoker: ActionInvoker::new(Arc::clone(&backend), scopes, instances),
            backend,
            registry: Arc::new(registry),
            marketplace_tools,
        })
    }

    pub fn registry(&self) -> &IntegrationRegistry {
        &self.registry
    }

    fn backend(&self) -> &dyn SoarBackend {
        self.backend.as_ref()
    }
}

#[derive(Clone)]
pub struct SoarMcpCore {
    tool_router: ToolRouter<Self>,
    services: Arc<McpToolServices>,
}

#[tool_router]
impl SoarMcpCore {
    /// Create a new MCP core handler with shared service dependencies.
    pub fn new(services: Arc<McpToolServices>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            services,
        }
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List cases in the SOAR platform. A case groups the alerts and response actions of one security incident. Returns the raw API response; pass next_page_token to fetch the next page. Case priority is an initial indicator only; use get_case_full_details for context."
    )]
    async fn list_cases(&self, param: Parameters<ListCasesRequest>) -> Result<CallToolResult, ErrorData> {
        let response = cases::list_cases(self.services.backend(), param.0.next_page_token.as_deref()).await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(open_world_hint = true),
        description = "Post a comment to a case. Use to document findings, actions taken, and the reasons for priority changes."
    )]
    async fn post_case_comment(&self, param: Parameters<PostCaseCommentRequest>) -> Result<CallToolResult, ErrorData> {
        let response = cases::post_case_comment(self.services.backend(), &param.0.case_id, &param.0.comment).await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List the alerts associated with a case. Follow up with list_events_by_alert for the underlying events."
    )]
    async fn list_alerts_by_case(&self, param: Parameters<CasePageRequest>) -> Result<CallToolResult, ErrorData> {
        let response = cases::list_alerts_by_case(self.services.backend(), &param.0.case_id, param.0.next_page_token.as_deref()).await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List the alert group identifiers of a case. The identifiers are required by marketplace action tools and by get_entities_by_alert_group_identifiers."
    )]
    async fn list_alert_group_identifiers_by_case(&self, param: Parameters<CasePageRequest>) -> Result<CallToolResult, ErrorData> {
        let response =
            cases::list_alert_group_identifiers_by_case(self.services.backend(), &param.0.case_id, param.0.next_page_token.as_deref())
                .await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List the security events behind one alert of a case."
    )]
    async fn list_events_by_alert(&self, param: Parameters<AlertEventsRequest>) -> Result<CallToolResult, ErrorData> {
        let request = &param.0;
        let response = cases::list_events_by_alert(
            self.services.backend(),
            &request.case_id,
            &request.alert_id,
            request.next_page_token.as_deref(),
        )
        .await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(open_world_hint = true),
        description = "Change the priority of a case. Priorities: PriorityUnspecified, PriorityInfo, PriorityLow, PriorityMedium, PriorityHigh, PriorityCritical."
    )]
    async fn change_case_priority(&self, param: Parameters<ChangeCasePriorityRequest>) -> Result<CallToolResult, ErrorData> {
        let response = cases::change_case_priority(self.services.backend(), &param.0.case_id, param.0.case_priority).await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Get the entities (addresses, hosts, users) involved in the given alert groups of a case. Useful for choosing target_entities for marketplace actions."
    )]
    async fn get_entities_by_alert_group_identifiers(
        &self,
        param: Parameters<AlertGroupEntitiesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let response =
            cases::get_entities_by_alert_group_identifiers(self.services.backend(), &param.0.case_id, &param.0.alert_group_identifiers)
                .await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Get the details the SOAR platform holds for one entity, identified by identifier, type and environment."
    )]
    async fn get_entity_details(&self, param: Parameters<EntityDetailsRequest>) -> Result<CallToolResult, ErrorData> {
        let request = &param.0;
        let response = cases::get_entity_details(
            self.services.backend(),
            &request.entity_identifier,
            &request.entity_type,
            &request.entity_environment,
        )
        .await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Search entities by term, type, suspicion, internal-asset and enrichment flags, network or environment. All filters are optional."
    )]
    async fn search_entity(&self, param: Parameters<SearchEntityRequest>) -> Result<CallToolResult, ErrorData> {
        let response = cases::search_entity(self.services.backend(), &param.0).await;
        Ok(tool_result(response))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Get a case, its alerts and its comments in one call. Returns {case_details, case_alerts, case_comments}."
    )]
    async fn get_case_full_details(&self, param: Parameters<CaseIdRequest>) -> Result<CallToolResult, ErrorData> {
        let response = cases::get_case_full_details(self.services.backend(), &param.0.case_id).await;
        Ok(tool_result(response))
    }
}

impl SoarMcpCore {
    /// Case-management tools followed by the enabled marketplace tools.
    pub fn tools(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.extend(self.services.marketplace_tools.iter().cloned());
        tools
    }

    /// Run a marketplace tool. Malformed arguments are reported as
    /// `invalid_params`; every other failure is a failure record in the result.
    pub async fn call_marketplace_tool(&self, name: &str, arguments: Option<&JsonObject>) -> Result<CallToolResult, ErrorData> {
        let action = self
            .services
            .registry
            .get(name)
            .ok_or_else(|| ErrorData::invalid_params(format!("unknown tool '{name}'"), None))?;
        let arguments =
            bind_arguments(&action.spec, arguments).map_err(|error| ErrorData::invalid_params(error.to_string(), None))?;
        debug!(tool = %name, integration = %action.integration, "invoking marketplace action");
        let response = self.services.invoker.invoke(action, arguments).await;
        Ok(tool_result(response))
    }
}

/// Objects are returned as structured content; any other JSON as text.
fn tool_result(value: Value) -> CallToolResult {
    match value {
        Value::Object(_) => CallToolResult::structured(value),
        other => CallToolResult::success(vec![Content::text(other.to_string())]),
    }
}

impl ServerHandler for SoarMcpCore {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(&self, request: CallToolRequestParams, context: RequestContext<RoleServer>) -> Result<CallToolResult, McpError> {
        if self.services.registry.contains(request.name.as_ref()) {
            return self.call_marketplace_tool(request.name.as_ref(), request.arguments.as_ref()).await;
        }
        let tool_context = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_context).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "secops-soar".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("SecOps SOAR MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "SecOps SOAR case management and marketplace actions.\nCASES:\n- Start with list_cases or get_case_full_details.\n- Use list_alert_group_identifiers_by_case to obtain alert_group_identifiers.\nMARKETPLACE ACTIONS:\n- Every action tool needs case_id and alert_group_identifiers.\n- Pass target_entities to run on specific entities; otherwise scope selects a predefined entity set (default \"All entities\").\n- Failures are returned as {\"Status\": \"Failed\", \"Message\": ...}."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use rmcp::model::ErrorCode;
    use serde_json::json;
    use soar_api::endpoints;
    use soar_registry::{IntegrationSelection, embedded_manifests};
    use soar_types::{ActionSpec, IntegrationManifest};

    fn core(backend: FakeBackend, integrations: &[&str]) -> SoarMcpCore {
        let selection = IntegrationSelection::from_names(integrations.iter().copied());
        let registry = IntegrationRegistry::from_manifests(embedded_manifests().unwrap(), &selection).unwrap();
        let services = McpToolServices::new(
            Arc::new(backend),
            registry,
            ScopeSet::new(["All entities"]),
            InstancePolicy::first(),
        )
        .unwrap();
        SoarMcpCore::new(Arc::new(services))
    }

    fn arguments(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn lists_case_tools_without_integrations() {
        let tools = core(FakeBackend::new(), &[]).tools();
        let names: Vec<String> = tools.iter().map(|tool| tool.name.to_string()).collect();
        assert_eq!(names.len(), 10);
        for expected in ["list_cases", "get_case_full_details", "search_entity", "change_case_priority"] {
            assert!(names.iter().any(|name| name == expected), "missing {expected}");
        }
    }

    #[test]
    fn enabled_integrations_add_marketplace_tools() {
        let core = core(FakeBackend::new(), &["AWS GuardDuty"]);
        let names: Vec<String> = core.tools().iter().map(|tool| tool.name.to_string()).collect();
        assert!(names.iter().any(|name| name == "aws_guard_duty_create_sample_findings"));
        assert!(!names.iter().any(|name| name.starts_with("virus_total")));
    }

    #[tokio::test]
    async fn missing_required_argument_is_invalid_params() {
        let core = core(FakeBackend::new(), &["AWSGuardDuty"]);
        let error = core
            .call_marketplace_tool(
                "aws_guard_duty_create_sample_findings",
                Some(&arguments(json!({"case_id": "1", "alert_group_identifiers": []}))),
            )
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert!(error.message.contains("detector_id"));
    }

    #[tokio::test]
    async fn failure_record_is_structured_content() {
        let backend = FakeBackend::new().respond(
            "GET",
            endpoints::integration_instances("AWSGuardDuty"),
            json!({"integration_instances": [{"environment": "Default"}]}),
        );
        let core = core(backend, &["AWSGuardDuty"]);
        let result = core
            .call_marketplace_tool(
                "aws_guard_duty_create_sample_findings",
                Some(&arguments(json!({"case_id": "1", "alert_group_identifiers": ["g"], "detector_id": "d"}))),
            )
            .await
            .unwrap();
        assert_eq!(
            result.structured_content,
            Some(json!({"Status": "Failed", "Message": "Instance found but identifier is missing."}))
        );
    }

    #[tokio::test]
    async fn array_responses_are_returned_as_text() {
        let backend = FakeBackend::new().respond("GET", endpoints::CASES, json!([{"id": 1}]));
        let core = core(backend, &[]);
        let result = core.list_cases(Parameters(ListCasesRequest::default())).await.unwrap();
        assert!(result.structured_content.is_none());
        let text = result.content[0].as_text().map(|text| text.text.clone());
        assert_eq!(text.as_deref(), Some("[{\"id\":1}]"));
    }

    #[tokio::test]
    async fn unknown_marketplace_tool_is_rejected() {
        let error = core(FakeBackend::new(), &[])
            .call_marketplace_tool("does_not_exist", None)
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn catalog_action_cannot_shadow_case_tool() {
        let manifest = IntegrationManifest {
            integration: "Shadow".into(),
            description: None,
            actions: vec![ActionSpec {
                name: "List Cases".into(),
                tool: Some("list_cases".into()),
                description: "Shadows a case tool.".into(),
                parameters: Vec::new(),
            }],
        };
        let registry = IntegrationRegistry::from_manifests(vec![manifest], &IntegrationSelection::All).unwrap();
        let error = McpToolServices::new(
            Arc::new(FakeBackend::new()),
            registry,
            ScopeSet::new(["All entities"]),
            InstancePolicy::first(),
        )
        .unwrap_err();
        assert_eq!(error.0, "list_cases");
    }
}
