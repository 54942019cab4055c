//! # Branch Guard Core
//!
//! This crate provides the webhook processing logic of Branch Guard, a receiver
//! for GitHub `repository` events that protects the default branch of every
//! newly created repository.
//!
//! ## Overview
//!
//! For each delivery the [`WebhookHandler`]:
//! 1. Verifies the `x-hub-signature-256` signature over the raw body
//! 2. Parses the repository event and skips anything but `created`
//! 3. Applies the configured branch protection policy to the default branch
//! 4. Files an issue announcing the applied policy
//!
//! ## Architecture
//!
//! The crate follows a dependency injection pattern for testability:
//! - [`auth_handler::SecretResolver`] supplies the signature secret and API token
//! - [`github_client::RepositoryClientFactory`] builds the GitHub client per request
//! - [`HandlerConfig`] carries the policy and the notification issue
//!
//! ## Error Handling
//!
//! [`WebhookHandler::handle`] returns a [`WebhookError`] on failure; each variant
//! maps to the HTTP status the receiver answers with via
//! [`WebhookError::status_code`].

pub mod config;
pub use config::{
    default_branch_protection_policy, describe_policy, notification_issue, HandlerConfig,
    DEFAULT_NOTIFIED_USER,
};

pub mod errors;
pub use errors::{UpstreamOperation, WebhookError};

pub mod handler;
pub use handler::{WebhookHandler, WebhookOutcome};
