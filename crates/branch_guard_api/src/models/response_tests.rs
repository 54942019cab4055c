//! Tests for response models

use super::*;

#[test]
fn test_protected_outcome_body() {
    let outcome = WebhookOutcome::Protected {
        owner: "octocat".to_string(),
        repository: "Hello-World".to_string(),
        branch: "main".to_string(),
    };

    let response = WebhookResponse::from_outcome(&outcome).unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "owner": "octocat",
            "repository": "Hello-World",
            "branch": "main",
            "status": "protected"
        })
    );
}

#[test]
fn test_ignored_outcome_has_no_body() {
    let outcome = WebhookOutcome::Ignored {
        action: Some("deleted".to_string()),
    };

    assert!(WebhookResponse::from_outcome(&outcome).is_none());
}

#[test]
fn test_health_check_serialization_skips_missing_version() {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        version: None,
        timestamp: "2025-11-12T10:30:00Z".to_string(),
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_none());
}
