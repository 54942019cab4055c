//! Branch protection domain types.
//!
//! This module contains the request body for GitHub's
//! [update branch protection](https://docs.github.com/rest/branches/branch-protection?apiVersion=2022-11-28#update-branch-protection)
//! endpoint.
//!
//! GitHub requires `required_status_checks`, `enforce_admins`,
//! `required_pull_request_reviews` and `restrictions` to be present on every
//! request, so those always serialize (as `null` when disabled). All other
//! fields are omitted from the body when unset.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Protection rules applied to a single branch.
///
/// # Examples
///
/// ```rust
/// use github_client::{BranchProtectionPolicy, RequiredStatusChecks};
///
/// let policy = BranchProtectionPolicy {
///     required_status_checks: Some(RequiredStatusChecks {
///         strict: true,
///         contexts: vec!["ci/build".to_string()],
///         checks: None,
///     }),
///     enforce_admins: Some(true),
///     ..Default::default()
/// };
///
/// let body = serde_json::to_value(&policy).unwrap();
/// assert!(body["restrictions"].is_null());
/// assert!(body.get("lock_branch").is_none());
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BranchProtectionPolicy {
    /// Status checks that must pass before merging. `None` disables the requirement.
    pub required_status_checks: Option<RequiredStatusChecks>,

    /// Whether the configured restrictions also apply to administrators.
    pub enforce_admins: Option<bool>,

    /// Pull request review requirements. `None` disables the requirement.
    pub required_pull_request_reviews: Option<RequiredPullRequestReviews>,

    /// Who may push to the branch. Only honoured for organization-owned repositories.
    pub restrictions: Option<PushRestrictions>,

    /// Prevent merge commits from being pushed to the branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_linear_history: Option<bool>,

    /// Permit force pushes by anyone with write access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_force_pushes: Option<bool>,

    /// Permit deletion of the branch by anyone with write access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_deletions: Option<bool>,

    /// Block pushes that create new branches unless the pusher is allowed by `restrictions`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_creations: Option<bool>,

    /// Require all review conversations to be resolved before merging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_conversation_resolution: Option<bool>,

    /// Make the branch read-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_branch: Option<bool>,

    /// Allow fork syncing while the branch is locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_fork_syncing: Option<bool>,
}

/// Status checks required before a pull request can be merged.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RequiredStatusChecks {
    /// Require branches to be up to date before merging.
    pub strict: bool,

    /// Deprecated list of required status check contexts. Still mandatory on the wire.
    pub contexts: Vec<String>,

    /// Fine-grained list of required checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<StatusCheck>>,
}

/// A single required status check.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StatusCheck {
    /// Name of the check.
    pub context: String,

    /// GitHub App that must provide the check. `-1` allows any app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
}

/// Review requirements for pull requests targeting the branch.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RequiredPullRequestReviews {
    /// Users, teams and apps that may dismiss reviews. Omit for personal repositories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissal_restrictions: Option<ActorAllowances>,

    /// Dismiss approving reviews when new commits are pushed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_stale_reviews: Option<bool>,

    /// Block merging until code owners have reviewed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_code_owner_reviews: Option<bool>,

    /// Number of approvals required, between 0 and 6.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approving_review_count: Option<u32>,

    /// The most recent push must be approved by someone other than its author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_last_push_approval: Option<bool>,

    /// Users, teams and apps allowed to bypass the pull request requirement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass_pull_request_allowances: Option<ActorAllowances>,
}

/// Lists of users, teams and apps granted an allowance.
///
/// Used for both dismissal restrictions and pull request bypass allowances.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ActorAllowances {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<String>>,
}

/// Users, teams and apps with push access to the branch.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PushRestrictions {
    pub users: Vec<String>,

    pub teams: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<String>>,
}
