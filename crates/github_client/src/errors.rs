//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with the GitHub API
//! through the github_client crate.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.create_issue("owner", "repo", &issue).await {
///     Ok(()) => println!("Issue filed"),
///     Err(Error::UnexpectedStatus(status)) => eprintln!("GitHub answered {}", status),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request could not be sent or its response could not be read.
    ///
    /// Covers connection failures, invalid URIs and body streaming errors.
    /// Details are logged where the failure happens.
    #[error("API request failed")]
    ApiError(),

    /// The GitHub client could not be initialized with the supplied credentials.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// GitHub answered with a non-success HTTP status.
    ///
    /// Client and server errors are not distinguished; the status code is
    /// the only information carried.
    #[error("GitHub responded with unexpected status {0}")]
    UnexpectedStatus(u16),
}

impl Error {
    /// The HTTP status GitHub answered with, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus(status) => Some(*status),
            _ => None,
        }
    }
}
