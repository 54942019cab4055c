//! Tests for webhook types.

use super::*;

fn event_json(action: &str) -> String {
    format!(
        r#"{{
            "action": "{action}",
            "repository": {{
                "id": 42,
                "name": "r",
                "full_name": "o/r",
                "private": true,
                "default_branch": "main",
                "owner": {{ "login": "o", "id": 7, "type": "User" }}
            }},
            "sender": {{ "login": "o", "id": 7 }},
            "installation": {{ "id": 99 }}
        }}"#
    )
}

#[test]
fn test_repositories_event_deserialization_ignores_unknown_fields() {
    let event: RepositoriesEvent = serde_json::from_str(&event_json("created")).unwrap();

    assert_eq!(event.action, "created");
    assert_eq!(event.repository.name, "r");
    assert_eq!(event.repository.default_branch, "main");
    assert_eq!(event.repository.owner.login, "o");
}

#[test]
fn test_is_created_only_for_created_action() {
    let created: RepositoriesEvent = serde_json::from_str(&event_json("created")).unwrap();
    let deleted: RepositoriesEvent = serde_json::from_str(&event_json("deleted")).unwrap();
    let upper: RepositoriesEvent = serde_json::from_str(&event_json("Created")).unwrap();

    assert!(created.is_created());
    assert!(!deleted.is_created());
    assert!(!upper.is_created());
}

#[test]
fn test_missing_repository_fails_to_deserialize() {
    let result = serde_json::from_str::<RepositoriesEvent>(r#"{ "action": "created" }"#);

    assert!(result.is_err());
}

#[test]
fn test_missing_default_branch_fails_to_deserialize() {
    let result = serde_json::from_str::<RepositoriesEvent>(
        r#"{ "action": "created", "repository": { "name": "r", "owner": { "login": "o" } } }"#,
    );

    assert!(result.is_err());
}

#[test]
fn test_envelope_reads_action_only() {
    let envelope: WebhookEnvelope = serde_json::from_str(r#"{"action": "deleted"}"#).unwrap();

    assert_eq!(envelope.action.as_deref(), Some("deleted"));
    assert!(!envelope.is_created());
}

#[test]
fn test_envelope_without_action() {
    let envelope: WebhookEnvelope =
        serde_json::from_str(r#"{"zen": "Design for failure.", "hook_id": 1}"#).unwrap();

    assert_eq!(envelope.action, None);
    assert!(!envelope.is_created());
}

#[test]
fn test_envelope_created_matches_full_event() {
    let envelope: WebhookEnvelope = serde_json::from_str(&event_json("created")).unwrap();

    assert!(envelope.is_created());
}

#[test]
fn test_envelope_rejects_non_object_payload() {
    assert!(serde_json::from_str::<WebhookEnvelope>("\"ping\"").is_err());
    assert!(serde_json::from_str::<WebhookEnvelope>(r#"{"action": 5}"#).is_err());
}
