//! GitHub webhook payload types.
//!
//! Only the fields needed to react to repository lifecycle events are
//! modelled. Everything else in the payload is ignored during
//! deserialization.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;

/// Action value GitHub sends when a repository has just been created.
pub const REPOSITORY_CREATED_ACTION: &str = "created";

/// The part of any webhook payload needed to decide whether to act on it.
///
/// Deliveries without an `action`, such as `ping`, deserialize with
/// `action: None`. Nothing else is required to be present.
///
/// # Examples
///
/// ```rust
/// use github_client::WebhookEnvelope;
///
/// let ping: WebhookEnvelope =
///     serde_json::from_str(r#"{"zen": "Keep it simple.", "hook_id": 1}"#).unwrap();
/// assert!(!ping.is_created());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub action: Option<String>,
}

impl WebhookEnvelope {
    /// Returns `true` when the delivery reports a newly created repository.
    pub fn is_created(&self) -> bool {
        self.action.as_deref() == Some(REPOSITORY_CREATED_ACTION)
    }
}

/// Payload of a `repository` webhook event.
///
/// See [GitHub webhook events documentation](https://docs.github.com/en/webhooks/webhook-events-and-payloads#repository).
///
/// # Examples
///
/// ```rust
/// use github_client::RepositoriesEvent;
///
/// let event: RepositoriesEvent = serde_json::from_str(r#"{
///     "action": "created",
///     "repository": {
///         "id": 1,
///         "name": "widgets",
///         "default_branch": "main",
///         "owner": { "login": "acme", "id": 2 }
///     },
///     "sender": { "login": "octocat" }
/// }"#).unwrap();
///
/// assert!(event.is_created());
/// assert_eq!(event.repository.owner.login, "acme");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoriesEvent {
    /// What happened to the repository, e.g. `created`, `deleted`, `archived`
    pub action: String,

    /// The repository the event refers to
    pub repository: Repository,
}

impl RepositoriesEvent {
    /// Returns `true` when the event reports a newly created repository.
    pub fn is_created(&self) -> bool {
        self.action == REPOSITORY_CREATED_ACTION
    }
}

/// Repository information carried in a webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    /// The name of the repository, without the owner
    pub name: String,

    /// The branch new pull requests target by default
    pub default_branch: String,

    /// The user or organization owning the repository
    pub owner: User,
}

/// Account information carried in a webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// The account handle
    pub login: String,
}
