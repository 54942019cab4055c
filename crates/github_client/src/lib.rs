//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for making authenticated requests to GitHub
//! with a bearer token, together with the request and webhook payload types
//! used when guarding newly created repositories.

use async_trait::async_trait;
use http::header::{HeaderName, ACCEPT};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

pub mod branch_protection;
pub use branch_protection::{
    ActorAllowances, BranchProtectionPolicy, PushRestrictions, RequiredPullRequestReviews,
    RequiredStatusChecks, StatusCheck,
};

pub mod errors;
pub use errors::Error;

pub mod issue;
pub use issue::CreateIssue;

pub mod webhook;
pub use webhook::{RepositoriesEvent, Repository, User, WebhookEnvelope, REPOSITORY_CREATED_ACTION};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Base URI of the public GitHub REST API.
pub const DEFAULT_API_BASE_URI: &str = "https://api.github.com";

/// REST API version requested on every call.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Write operations performed against a repository.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Replaces the protection rules of a branch.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    /// * `branch` - The branch to protect.
    /// * `policy` - The complete set of rules to apply.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` if GitHub answers with a non-success
    /// status, or `Error::ApiError` if the request could not be completed.
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        policy: &BranchProtectionPolicy,
    ) -> Result<(), Error>;

    /// Opens a new issue in a repository.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnexpectedStatus` if GitHub answers with a non-success
    /// status, or `Error::ApiError` if the request could not be completed.
    async fn create_issue(&self, owner: &str, repo: &str, issue: &CreateIssue)
        -> Result<(), Error>;
}

/// Builds a [`RepositoryClient`] for a bearer token.
///
/// Tokens are resolved per request, so clients are created per request too.
pub trait RepositoryClientFactory: Send + Sync {
    fn create_client(&self, token: &SecretString) -> Result<Box<dyn RepositoryClient>, Error>;
}

/// A client for interacting with the GitHub API, authenticated with a bearer token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from a configured `Octocrab` instance.
    ///
    /// Use [`create_token_client`] to build an instance with the headers
    /// GitHub expects.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: WriteMethod,
        path: String,
        body: &B,
    ) -> Result<(), Error> {
        debug!("Making API call to: {} {}", method.as_str(), path);
        let result = match method {
            WriteMethod::Put => self.client._put(path, Some(body)).await,
            WriteMethod::Post => self.client._post(path, Some(body)).await,
        };

        let response = result.map_err(|e| {
            log_octocrab_error("Failed to send request to GitHub", e);
            Error::ApiError()
        })?;

        let status = response.status();
        let text = self.client.body_to_string(response).await.map_err(|e| {
            log_octocrab_error("Failed to read GitHub response body", e);
            Error::ApiError()
        })?;

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                response_body = %text,
                "GitHub rejected the request"
            );
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        debug!(status = status.as_u16(), response_body = %text, "GitHub accepted the request");
        Ok(())
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    #[instrument(skip(self, policy), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        policy: &BranchProtectionPolicy,
    ) -> Result<(), Error> {
        let path = format!("/repos/{}/{}/branches/{}/protection", owner, repo, branch);
        self.send(WriteMethod::Put, path, policy).await?;

        info!(
            owner = owner,
            repo = repo,
            branch = branch,
            "Updated branch protection"
        );
        Ok(())
    }

    #[instrument(skip(self, issue), fields(owner = %owner, repo = %repo))]
    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &CreateIssue,
    ) -> Result<(), Error> {
        let path = format!("/repos/{}/{}/issues", owner, repo);
        self.send(WriteMethod::Post, path, issue).await?;

        info!(owner = owner, repo = repo, title = %issue.title, "Created issue");
        Ok(())
    }
}

/// Creates [`GitHubClient`]s against a fixed API base URI.
#[derive(Debug, Clone)]
pub struct GitHubClientFactory {
    base_uri: String,
}

impl GitHubClientFactory {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }
}

impl Default for GitHubClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URI)
    }
}

impl RepositoryClientFactory for GitHubClientFactory {
    fn create_client(&self, token: &SecretString) -> Result<Box<dyn RepositoryClient>, Error> {
        let octocrab = create_token_client(token.expose_secret(), &self.base_uri)?;
        Ok(Box::new(GitHubClient::new(octocrab)))
    }
}

#[derive(Clone, Copy, Debug)]
enum WriteMethod {
    Put,
    Post,
}

impl WriteMethod {
    fn as_str(&self) -> &'static str {
        match self {
            WriteMethod::Put => "PUT",
            WriteMethod::Post => "POST",
        }
    }
}

/// Creates an `Octocrab` client that authenticates with a bearer token.
///
/// The client sends the `Accept` and `X-GitHub-Api-Version` headers GitHub
/// recommends and never retries failed requests.
///
/// # Errors
///
/// Returns `Error::AuthError` if `base_uri` is not a valid URI, or
/// `Error::ApiError` if the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient, DEFAULT_API_BASE_URI};
///
/// let octocrab = create_token_client("ghp_example", DEFAULT_API_BASE_URI).unwrap();
/// let client = GitHubClient::new(octocrab);
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &str, base_uri: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|e| {
            error!(base_uri = base_uri, error = %e, "Invalid GitHub API base URI");
            Error::AuthError(format!("Invalid GitHub API base URI: {}", base_uri))
        })?
        .personal_token(token.to_string())
        .add_header(ACCEPT, "application/vnd.github+json".to_string())
        .add_header(
            HeaderName::from_static("x-github-api-version"),
            GITHUB_API_VERSION.to_string(),
        )
        .add_retry_config(RetryConfig::None)
        .build()
        .map_err(|e| {
            error!(error = ?e, "Failed to build Octocrab client");
            Error::ApiError()
        })
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
