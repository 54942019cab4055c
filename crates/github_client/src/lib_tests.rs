//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Test Constants ---
const TEST_TOKEN: &str = "test-token";
const OWNER: &str = "test-owner";
const REPO: &str = "test-repo";

fn create_client(mock_server: &MockServer) -> GitHubClient {
    let octocrab = create_token_client(TEST_TOKEN, &mock_server.uri()).unwrap();
    GitHubClient::new(octocrab)
}

fn test_policy() -> BranchProtectionPolicy {
    BranchProtectionPolicy {
        required_status_checks: Some(RequiredStatusChecks {
            strict: true,
            contexts: vec!["ci/build".to_string()],
            checks: None,
        }),
        enforce_admins: Some(true),
        required_pull_request_reviews: Some(RequiredPullRequestReviews {
            required_approving_review_count: Some(1),
            ..Default::default()
        }),
        restrictions: None,
        allow_force_pushes: Some(false),
        ..Default::default()
    }
}

fn test_issue() -> CreateIssue {
    CreateIssue {
        title: "Protected".to_string(),
        body: Some("The default branch is now protected.".to_string()),
        labels: Some(vec!["enhancement".to_string()]),
        assignees: Some(vec!["octocat".to_string()]),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_update_branch_protection_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/repos/{OWNER}/{REPO}/branches/main/protection")))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-github-api-version", GITHUB_API_VERSION))
        .and(body_json(json!({
            "required_status_checks": { "strict": true, "contexts": ["ci/build"] },
            "enforce_admins": true,
            "required_pull_request_reviews": { "required_approving_review_count": 1 },
            "restrictions": null,
            "allow_force_pushes": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://api.github.com/repos/test-owner/test-repo/branches/main/protection"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client
        .update_branch_protection(OWNER, REPO, "main", &test_policy())
        .await;

    if let Err(e) = &result {
        eprintln!("update_branch_protection error: {e:?}");
    }
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_branch_protection_reports_status_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/repos/{OWNER}/{REPO}/branches/main/protection")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client
        .update_branch_protection(OWNER, REPO, "main", &test_policy())
        .await;

    assert!(matches!(result, Err(Error::UnexpectedStatus(422))));
}

#[tokio::test]
async fn test_update_branch_protection_does_not_retry_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/repos/{OWNER}/{REPO}/branches/main/protection")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client
        .update_branch_protection(OWNER, REPO, "main", &test_policy())
        .await;

    assert!(matches!(result, Err(Error::UnexpectedStatus(503))));
}

#[tokio::test]
async fn test_create_issue_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{OWNER}/{REPO}/issues")))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "title": "Protected",
            "body": "The default branch is now protected.",
            "labels": ["enhancement"],
            "assignees": ["octocat"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "number": 1,
            "title": "Protected"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client.create_issue(OWNER, REPO, &test_issue()).await;

    if let Err(e) = &result {
        eprintln!("create_issue error: {e:?}");
    }
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_issue_reports_status_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{OWNER}/{REPO}/issues")))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client.create_issue(OWNER, REPO, &test_issue()).await;

    assert!(matches!(result, Err(Error::UnexpectedStatus(410))));
}

#[tokio::test]
async fn test_unreachable_server_is_api_error() {
    // Nothing listens on port 1
    let octocrab = create_token_client(TEST_TOKEN, "http://127.0.0.1:1").unwrap();
    let client = GitHubClient::new(octocrab);

    let result = client.create_issue(OWNER, REPO, &test_issue()).await;

    assert!(matches!(result, Err(Error::ApiError())));
}

#[test]
fn test_create_token_client_rejects_invalid_base_uri() {
    let result = create_token_client(TEST_TOKEN, "not a uri");

    assert!(matches!(result, Err(Error::AuthError(_))));
}

#[tokio::test]
async fn test_factory_creates_client_for_base_uri() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{OWNER}/{REPO}/issues")))
        .and(header("authorization", "Bearer factory-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 2 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let factory = GitHubClientFactory::new(mock_server.uri());
    let token = SecretString::from("factory-token".to_string());

    let client = factory.create_client(&token).unwrap();
    let result = client.create_issue(OWNER, REPO, &test_issue()).await;

    assert!(result.is_ok());
}

#[test]
fn test_default_factory_targets_public_api() {
    let factory = GitHubClientFactory::default();

    assert_eq!(factory.base_uri(), DEFAULT_API_BASE_URI);
}
