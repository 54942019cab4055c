//! Issue domain types.
//!
//! This module contains the request body for GitHub's
//! [create an issue](https://docs.github.com/rest/issues/issues?apiVersion=2022-11-28#create-an-issue)
//! endpoint.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;

/// Request body for creating an issue.
///
/// Labels, assignees and milestones are silently dropped by GitHub when the
/// caller lacks push access to the repository.
///
/// # Examples
///
/// ```rust
/// use github_client::CreateIssue;
///
/// let issue = CreateIssue {
///     title: "Welcome".to_string(),
///     labels: Some(vec!["documentation".to_string()]),
///     ..Default::default()
/// };
///
/// let body = serde_json::to_value(&issue).unwrap();
/// assert_eq!(body["title"], "Welcome");
/// assert!(body.get("milestone").is_none());
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CreateIssue {
    /// The title of the issue
    pub title: String,

    /// The Markdown contents of the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Deprecated single assignee. Prefer `assignees`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Number of the milestone to associate the issue with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,

    /// Labels to associate with the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    /// Logins of the users to assign
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
}
