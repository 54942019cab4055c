//! Error types for webhook processing.
//!
//! Every failure of [`crate::WebhookHandler::handle`] is a [`WebhookError`].
//! Each variant knows the HTTP status the receiver answers with, so the HTTP
//! layer never has to inspect messages.

use std::fmt;

use auth_handler::{SecretError, SecretErrorKind, SecretId};
use http::StatusCode;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// GitHub operation that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamOperation {
    /// Building the API client from the resolved token
    ClientSetup,
    /// Applying the protection policy to the default branch
    BranchProtection,
    /// Filing the notification issue
    CreateIssue,
}

impl fmt::Display for UpstreamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamOperation::ClientSetup => write!(f, "GitHub client setup"),
            UpstreamOperation::BranchProtection => write!(f, "Branch protection update"),
            UpstreamOperation::CreateIssue => write!(f, "Issue creation"),
        }
    }
}

/// Errors that can occur while handling a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A secret could not be resolved.
    ///
    /// The status depends on the failure kind: 403 for `Forbidden`, 404 for
    /// `NotFound`, 500 otherwise.
    #[error("Unable to resolve the {secret}: {source}")]
    Secret {
        secret: SecretId,
        #[source]
        source: SecretError,
    },

    /// The `x-hub-signature-256` header is missing or does not match the body.
    #[error("\"x-hub-signature-256\" header signature and calculated signature didn't match.")]
    SignatureMismatch,

    /// The body is not a valid repository event.
    #[error("Unable to process the request. Error: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// A GitHub call failed.
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: UpstreamOperation,
        #[source]
        source: github_client::Error,
    },
}

impl WebhookError {
    /// The HTTP status the receiver answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Secret { source, .. } => match source.kind {
                SecretErrorKind::Forbidden => StatusCode::FORBIDDEN,
                SecretErrorKind::NotFound => StatusCode::NOT_FOUND,
                SecretErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            },
            WebhookError::SignatureMismatch => StatusCode::BAD_REQUEST,
            WebhookError::MalformedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code used in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::Secret { .. } => "SecretResolutionError",
            WebhookError::SignatureMismatch => "SignatureMismatch",
            WebhookError::MalformedPayload(_) => "MalformedPayload",
            WebhookError::Upstream { .. } => "UpstreamError",
        }
    }
}
