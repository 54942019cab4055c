//! Handler configuration: the protection policy to apply and the issue to file.
//!
//! Both values are fixed when the handler is constructed and never change
//! afterwards.

use github_client::{
    BranchProtectionPolicy, CreateIssue, RequiredPullRequestReviews, RequiredStatusChecks,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// User mentioned in, and assigned to, the notification issue by default.
pub const DEFAULT_NOTIFIED_USER: &str = "shiroyama";

/// Title of the notification issue.
pub const NOTIFICATION_TITLE: &str = "Branch protection was automatically configured.";

/// Label attached to the notification issue.
pub const NOTIFICATION_LABEL: &str = "enhancement";

/// Status check required by the default policy.
pub const DEFAULT_STATUS_CHECK: &str = "continuous-integration/travis-ci";

const POLICY_DOCUMENTATION_URL: &str = "https://docs.github.com/en/rest/branches/branch-protection?apiVersion=2022-11-28#update-branch-protection";

/// What the handler does to a newly created repository.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerConfig {
    /// Protection applied to the default branch
    pub policy: BranchProtectionPolicy,
    /// Issue filed once the policy has been applied
    pub issue: CreateIssue,
}

impl HandlerConfig {
    pub fn new(policy: BranchProtectionPolicy, issue: CreateIssue) -> Self {
        Self { policy, issue }
    }

    /// Default policy with the notification addressed to `user`.
    pub fn for_user(user: &str) -> Self {
        let policy = default_branch_protection_policy();
        let issue = notification_issue(user, &policy);
        Self { policy, issue }
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::for_user(DEFAULT_NOTIFIED_USER)
    }
}

/// The policy applied to every new repository unless configured otherwise.
///
/// Requires an up-to-date branch with a passing CI check, two approving
/// reviews including a code owner, applies to administrators and blocks
/// force pushes.
pub fn default_branch_protection_policy() -> BranchProtectionPolicy {
    BranchProtectionPolicy {
        required_status_checks: Some(RequiredStatusChecks {
            strict: true,
            contexts: vec![DEFAULT_STATUS_CHECK.to_string()],
            checks: None,
        }),
        enforce_admins: Some(true),
        required_pull_request_reviews: Some(RequiredPullRequestReviews {
            dismiss_stale_reviews: Some(true),
            require_code_owner_reviews: Some(true),
            required_approving_review_count: Some(2),
            ..Default::default()
        }),
        restrictions: None,
        allow_force_pushes: Some(false),
        ..Default::default()
    }
}

/// Builds the issue announcing that `policy` was applied.
///
/// The issue mentions and is assigned to `user` and lists the policy settings.
pub fn notification_issue(user: &str, policy: &BranchProtectionPolicy) -> CreateIssue {
    let body = format!(
        "@{user} {NOTIFICATION_TITLE}\n\n{}\nSee [Update branch protection]({POLICY_DOCUMENTATION_URL}) for details.\n",
        describe_policy(policy)
    );

    CreateIssue {
        title: NOTIFICATION_TITLE.to_string(),
        body: Some(body),
        assignees: Some(vec![user.to_string()]),
        labels: Some(vec![NOTIFICATION_LABEL.to_string()]),
        ..Default::default()
    }
}

/// Renders a policy as a Markdown list.
///
/// The four mandatory settings are always listed (`None` when disabled);
/// optional flags only when set.
pub fn describe_policy(policy: &BranchProtectionPolicy) -> String {
    let mut lines = Vec::new();

    match &policy.required_status_checks {
        Some(checks) => {
            lines.push("- required_status_checks:".to_string());
            lines.push(format!("    - strict: {}", checks.strict));
            lines.push(format!("    - contexts: {}", checks.contexts.join(",")));
            if let Some(list) = &checks.checks {
                let names: Vec<&str> = list.iter().map(|c| c.context.as_str()).collect();
                lines.push(format!("    - checks: {}", names.join(",")));
            }
        }
        None => lines.push("- required_status_checks: None".to_string()),
    }

    lines.push(format!("- enforce_admins: {}", display_option(&policy.enforce_admins)));

    match &policy.required_pull_request_reviews {
        Some(reviews) => {
            lines.push("- required_pull_request_reviews:".to_string());
            push_flag(&mut lines, "    ", "dismiss_stale_reviews", &reviews.dismiss_stale_reviews);
            push_flag(
                &mut lines,
                "    ",
                "require_code_owner_reviews",
                &reviews.require_code_owner_reviews,
            );
            push_flag(
                &mut lines,
                "    ",
                "required_approving_review_count",
                &reviews.required_approving_review_count,
            );
            push_flag(
                &mut lines,
                "    ",
                "require_last_push_approval",
                &reviews.require_last_push_approval,
            );
        }
        None => lines.push("- required_pull_request_reviews: None".to_string()),
    }

    match &policy.restrictions {
        Some(restrictions) => {
            lines.push("- restrictions:".to_string());
            lines.push(format!("    - users: {}", restrictions.users.join(",")));
            lines.push(format!("    - teams: {}", restrictions.teams.join(",")));
            if let Some(apps) = &restrictions.apps {
                lines.push(format!("    - apps: {}", apps.join(",")));
            }
        }
        None => lines.push("- restrictions: None".to_string()),
    }

    push_flag(&mut lines, "", "required_linear_history", &policy.required_linear_history);
    push_flag(&mut lines, "", "allow_force_pushes", &policy.allow_force_pushes);
    push_flag(&mut lines, "", "allow_deletions", &policy.allow_deletions);
    push_flag(&mut lines, "", "block_creations", &policy.block_creations);
    push_flag(
        &mut lines,
        "",
        "required_conversation_resolution",
        &policy.required_conversation_resolution,
    );
    push_flag(&mut lines, "", "lock_branch", &policy.lock_branch);
    push_flag(&mut lines, "", "allow_fork_syncing", &policy.allow_fork_syncing);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_flag<T: std::fmt::Display>(
    lines: &mut Vec<String>,
    indent: &str,
    name: &str,
    value: &Option<T>,
) {
    if let Some(value) = value {
        lines.push(format!("{indent}- {name}: {value}"));
    }
}

fn display_option<T: std::fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "None".to_string(),
    }
}
