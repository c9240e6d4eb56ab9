use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use soar_types::CasePriority;

/// Parameters for listing cases.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCasesRequest {
    #[schemars(description = "The nextPageToken to fetch the next page of results.")]
    pub next_page_token: Option<String>,
}

/// Parameters for adding a comment to a case.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostCaseCommentRequest {
    #[schemars(description = "The ID of the case.")]
    pub case_id: String,
    #[schemars(description = "The comment to add to the case.")]
    pub comment: String,
}

/// Parameters for case-scoped paginated listings.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CasePageRequest {
    #[schemars(description = "The ID of the case.")]
    pub case_id: String,
    #[schemars(description = "The nextPageToken to fetch the next page of results.")]
    pub next_page_token: Option<String>,
}

/// Parameters for listing the events behind one alert.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AlertEventsRequest {
    #[schemars(description = "The ID of the case.")]
    pub case_id: String,
    #[schemars(description = "The ID of the alert.")]
    pub alert_id: String,
    #[schemars(description = "The nextPageToken to fetch the next page of results.")]
    pub next_page_token: Option<String>,
}

/// Parameters for changing a case priority.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeCasePriorityRequest {
    #[schemars(description = "The ID of the case.")]
    pub case_id: String,
    #[schemars(description = "The priority of the case.")]
    pub case_priority: CasePriority,
}

/// Parameters for the entity lookup by alert group.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AlertGroupEntitiesRequest {
    #[schemars(description = "The ID of the case.")]
    pub case_id: String,
    #[schemars(description = "Identifiers for the alert groups.")]
    pub alert_group_identifiers: Vec<String>,
}

/// Parameters for fetching one entity.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EntityDetailsRequest {
    #[schemars(description = "The identifier of the entity.")]
    pub entity_identifier: String,
    #[schemars(description = "The type of the entity.")]
    pub entity_type: String,
    #[schemars(description = "The environment of the entity.")]
    pub entity_environment: String,
}

/// Entity search filters. Every filter is optional.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEntityRequest {
    #[schemars(description = "The term to search for.")]
    pub term: Option<String>,
    #[serde(rename = "type")]
    #[schemars(description = "The types of the entity.")]
    pub entity_types: Option<Vec<String>>,
    #[schemars(description = "Whether the entity is suspicious.")]
    pub is_suspicious: Option<bool>,
    #[schemars(description = "Whether the entity is an internal asset.")]
    pub is_internal_asset: Option<bool>,
    #[schemars(description = "Whether the entity is enriched.")]
    pub is_enriched: Option<bool>,
    #[schemars(description = "The network names.")]
    pub network_name: Option<Vec<String>>,
    #[schemars(description = "The environment names.")]
    pub environment_name: Option<Vec<String>>,
}

/// Parameters for the aggregated case view.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CaseIdRequest {
    #[schemars(description = "The ID of the case.")]
    pub case_id: String,
}
