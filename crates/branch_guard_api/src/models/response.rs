//! HTTP response type definitions
//!
//! Response types convert from domain results via `From` and use camelCase
//! for JSON serialization.

use branch_guard_core::WebhookOutcome;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;

/// Body of a successful webhook response.
///
/// # Example
///
/// ```json
/// {
///   "owner": "octocat",
///   "repository": "Hello-World",
///   "branch": "main",
///   "status": "protected"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub status: String,
}

impl WebhookResponse {
    /// Builds the response body for an outcome.
    ///
    /// Ignored deliveries answer `304` without a body, so only protected
    /// outcomes produce one.
    pub fn from_outcome(outcome: &WebhookOutcome) -> Option<Self> {
        match outcome {
            WebhookOutcome::Protected {
                owner,
                repository,
                branch,
            } => Some(Self {
                owner: owner.clone(),
                repository: repository.clone(),
                branch: branch.clone(),
                status: "protected".to_string(),
            }),
            WebhookOutcome::Ignored { .. } => None,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    /// Service status: "healthy" or "unhealthy"
    pub status: String,

    /// Service version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Current timestamp (ISO 8601)
    pub timestamp: String,
}
