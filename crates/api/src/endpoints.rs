//! SOAR external API paths.
//!
//! Paths are relative to the configured base URL. Dynamic segments are
//! percent-encoded.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const EXECUTE_MANUAL_ACTION: &str = "/api/external/v1/cases/ExecuteManualAction";
pub const GET_SCOPES: &str = "/api/external/v1/settings/GetScopes";
pub const CASES: &str = "/api/1p/external/v1/cases";
pub const ALERTS_ENTITIES: &str = "/api/external/v1/case-overview/GetAlertsEntities";
pub const ENTITY_DATA: &str = "/api/external/v1/entities/GetEntityData";
pub const ENTITY_SEARCH: &str = "/api/external/v1.0/entity-search/entities";

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Instances configured for an integration, projected to their identifiers.
pub fn integration_instances(integration: &str) -> String {
    format!(
        "/api/1p/external/v1/integrations/{}/integrationInstances?$select=identifier",
        segment(integration)
    )
}

pub fn case(case_id: &str) -> String {
    format!("{CASES}/{}", segment(case_id))
}

pub fn case_comments(case_id: &str) -> String {
    format!("{}/comments", case(case_id))
}

pub fn case_alerts(case_id: &str) -> String {
    format!("/api/1p/external/v1.0/cases/{}/caseAlerts", segment(case_id))
}

pub fn alert_group_identifiers(case_id: &str) -> String {
    format!("{}?$select=alertGroupIdentifier", case_alerts(case_id))
}

pub fn involved_events(case_id: &str, alert_id: &str) -> String {
    format!(
        "/api/1p/external/v1.0/cases/{}/alerts/{}/involvedEvents",
        segment(case_id),
        segment(alert_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_instance_lookup_path() {
        assert_eq!(
            integration_instances("AWSGuardDuty"),
            "/api/1p/external/v1/integrations/AWSGuardDuty/integrationInstances?$select=identifier"
        );
        assert_eq!(
            integration_instances("My Integration/v2"),
            "/api/1p/external/v1/integrations/My%20Integration%2Fv2/integrationInstances?$select=identifier"
        );
    }

    #[test]
    fn builds_case_paths() {
        assert_eq!(case("7"), "/api/1p/external/v1/cases/7");
        assert_eq!(case_comments("7"), "/api/1p/external/v1/cases/7/comments");
        assert_eq!(case_alerts("7"), "/api/1p/external/v1.0/cases/7/caseAlerts");
        assert_eq!(
            alert_group_identifiers("7"),
            "/api/1p/external/v1.0/cases/7/caseAlerts?$select=alertGroupIdentifier"
        );
        assert_eq!(involved_events("7", "a1"), "/api/1p/external/v1.0/cases/7/alerts/a1/involvedEvents");
    }
}
