//! Case-management calls against the SOAR backend.
//!
//! Each function returns the backend JSON unmodified, or a failure record
//! when the request does not succeed.

use futures_util::future::join3;
use serde_json::{Value, json};
use soar_api::{ApiError, SoarBackend, endpoints};
use soar_types::{CasePriority, failure_value};
use tracing::warn;

use crate::server::schemas::SearchEntityRequest;

fn page_query(next_page_token: Option<&str>) -> Vec<(&'static str, &str)> {
    next_page_token.map(|token| vec![("pageToken", token)]).unwrap_or_default()
}

fn into_response(operation: &str, result: Result<Value, ApiError>) -> Value {
    result.unwrap_or_else(|error| {
        warn!(%operation, %error, "SOAR request failed");
        failure_value(error.to_string())
    })
}

pub async fn list_cases(backend: &dyn SoarBackend, next_page_token: Option<&str>) -> Value {
    let query = match next_page_token {
        Some(token) => vec![("$expand", "tags"), ("pageToken", token)],
        None => Vec::new(),
    };
    into_response("list_cases", backend.get_json(endpoints::CASES, &query).await)
}

pub async fn post_case_comment(backend: &dyn SoarBackend, case_id: &str, comment: &str) -> Value {
    let body = json!({ "Comment": comment });
    into_response(
        "post_case_comment",
        backend.post_json(&endpoints::case_comments(case_id), &body).await,
    )
}

pub async fn list_alerts_by_case(backend: &dyn SoarBackend, case_id: &str, next_page_token: Option<&str>) -> Value {
    into_response(
        "list_alerts_by_case",
        backend
            .get_json(&endpoints::case_alerts(case_id), &page_query(next_page_token))
            .await,
    )
}

pub async fn list_alert_group_identifiers_by_case(
    backend: &dyn SoarBackend,
    case_id: &str,
    next_page_token: Option<&str>,
) -> Value {
    into_response(
        "list_alert_group_identifiers_by_case",
        backend
            .get_json(&endpoints::alert_group_identifiers(case_id), &page_query(next_page_token))
            .await,
    )
}

pub async fn list_events_by_alert(
    backend: &dyn SoarBackend,
    case_id: &str,
    alert_id: &str,
    next_page_token: Option<&str>,
) -> Value {
    into_response(
        "list_events_by_alert",
        backend
            .get_json(&endpoints::involved_events(case_id, alert_id), &page_query(next_page_token))
            .await,
    )
}

pub async fn change_case_priority(backend: &dyn SoarBackend, case_id: &str, priority: CasePriority) -> Value {
    let body = json!({ "Priority": priority.as_str() });
    into_response(
        "change_case_priority",
        backend.patch_json(&endpoints::case(case_id), &body).await,
    )
}

/// The case id is forwarded as given; the endpoint accepts it as a string.
pub async fn get_entities_by_alert_group_identifiers(
    backend: &dyn SoarBackend,
    case_id: &str,
    alert_group_identifiers: &[String],
) -> Value {
    let body = json!({
        "caseId": case_id,
        "alertGroupIdentifiers": alert_group_identifiers,
    });
    into_response(
        "get_entities_by_alert_group_identifiers",
        backend.post_json(endpoints::ALERTS_ENTITIES, &body).await,
    )
}

pub async fn get_entity_details(
    backend: &dyn SoarBackend,
    entity_identifier: &str,
    entity_type: &str,
    entity_environment: &str,
) -> Value {
    let body = json!({
        "EntityIdentifier": entity_identifier,
        "EntityType": entity_type,
        "EntityEnvironment": entity_environment,
        "LastCaseType": 0,
        "CaseDistributionType": 0,
    });
    into_response("get_entity_details", backend.post_json(endpoints::ENTITY_DATA, &body).await)
}

/// Unset filters are sent as `null`.
pub async fn search_entity(backend: &dyn SoarBackend, filters: &SearchEntityRequest) -> Value {
    let body = json!({
        "Term": filters.term,
        "Type": filters.entity_types,
        "IsSuspicious": filters.is_suspicious,
        "IsInternalAsset": filters.is_internal_asset,
        "IsEnriched": filters.is_enriched,
        "NetworkName": filters.network_name,
        "EnvironmentName": filters.environment_name,
    });
    into_response("search_entity", backend.post_json(endpoints::ENTITY_SEARCH, &body).await)
}

/// Case, alerts and comments fetched concurrently. A failed slot holds a
/// failure record; the other slots are unaffected.
pub async fn get_case_full_details(backend: &dyn SoarBackend, case_id: &str) -> Value {
    let case_path = endpoints::case(case_id);
    let alerts_path = endpoints::case_alerts(case_id);
    let comments_path = endpoints::case_comments(case_id);
    let (details, alerts, comments) = join3(
        backend.get_json(&case_path, &[]),
        backend.get_json(&alerts_path, &[]),
        backend.get_json(&comments_path, &[]),
    )
    .await;

    json!({
        "case_details": into_response("get_case_details", details),
        "case_alerts": into_response("list_case_alerts", alerts),
        "case_comments": into_response("list_case_comments", comments),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn list_cases_adds_expand_only_with_page_token() {
        let backend = FakeBackend::new().respond("GET", endpoints::CASES, json!({"cases": []}));

        assert_eq!(list_cases(&backend, None).await, json!({"cases": []}));
        list_cases(&backend, Some("tok")).await;

        let calls = backend.calls_to("GET", endpoints::CASES);
        assert!(calls[0].query.is_empty());
        assert_eq!(
            calls[1].query,
            vec![("$expand".to_string(), "tags".to_string()), ("pageToken".to_string(), "tok".to_string())]
        );
    }

    #[tokio::test]
    async fn comment_and_priority_bodies() {
        let backend = FakeBackend::new()
            .respond("POST", endpoints::case_comments("523"), json!({"id": 1}))
            .respond("PATCH", endpoints::case("523"), Value::Null);

        post_case_comment(&backend, "523", "Investigating").await;
        change_case_priority(&backend, "523", CasePriority::PriorityHigh).await;

        let calls = backend.calls();
        assert_eq!(calls[0].body, Some(json!({"Comment": "Investigating"})));
        assert_eq!(calls[1].method, "PATCH");
        assert_eq!(calls[1].body, Some(json!({"Priority": "PriorityHigh"})));
    }

    #[tokio::test]
    async fn alert_group_identifiers_keep_select_and_page_token() {
        let path = endpoints::alert_group_identifiers("9");
        let backend = FakeBackend::new().respond("GET", path.clone(), json!(["g1"]));

        assert_eq!(list_alert_group_identifiers_by_case(&backend, "9", Some("p2")).await, json!(["g1"]));
        let call = &backend.calls_to("GET", &path)[0];
        assert!(call.path.ends_with("caseAlerts?$select=alertGroupIdentifier"));
        assert_eq!(call.query, vec![("pageToken".to_string(), "p2".to_string())]);
    }

    #[tokio::test]
    async fn search_entity_sends_null_for_unset_filters() {
        let backend = FakeBackend::new().respond("POST", endpoints::ENTITY_SEARCH, json!({"objectsList": []}));
        let filters = SearchEntityRequest {
            term: Some("10.0".into()),
            is_suspicious: Some(true),
            ..Default::default()
        };

        search_entity(&backend, &filters).await;
        assert_eq!(
            backend.calls()[0].body,
            Some(json!({
                "Term": "10.0",
                "Type": null,
                "IsSuspicious": true,
                "IsInternalAsset": null,
                "IsEnriched": null,
                "NetworkName": null,
                "EnvironmentName": null
            }))
        );
    }

    #[tokio::test]
    async fn entity_details_body_carries_fixed_case_fields() {
        let backend = FakeBackend::new().respond("POST", endpoints::ENTITY_DATA, json!({}));
        get_entity_details(&backend, "192.168.1.100", "ADDRESS", "Default Environment").await;
        let body = backend.calls()[0].body.clone().unwrap();
        assert_eq!(body["LastCaseType"], 0);
        assert_eq!(body["CaseDistributionType"], 0);
        assert_eq!(body["EntityEnvironment"], "Default Environment");
    }

    #[tokio::test]
    async fn full_details_isolates_failing_slot() {
        let backend = FakeBackend::new()
            .respond("GET", endpoints::case("5"), json!({"id": 5}))
            .fail("GET", endpoints::case_alerts("5"), "boom")
            .respond("GET", endpoints::case_comments("5"), json!([]));

        let details = get_case_full_details(&backend, "5").await;
        assert_eq!(details["case_details"], json!({"id": 5}));
        assert_eq!(details["case_alerts"]["Status"], "Failed");
        assert!(details["case_alerts"]["Message"].as_str().unwrap().contains("boom"));
        assert_eq!(details["case_comments"], json!([]));
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn failures_become_failure_records() {
        let backend = FakeBackend::new().fail("POST", endpoints::ALERTS_ENTITIES, "unavailable");
        let response = get_entities_by_alert_group_identifiers(&backend, "1", &["g".to_string()]).await;
        assert_eq!(response["Status"], "Failed");
        assert_eq!(
            backend.calls()[0].body,
            Some(json!({"caseId": "1", "alertGroupIdentifiers": ["g"]}))
        );
    }
}
