//! Webhook handling: verify, filter, protect, notify.

use std::sync::Arc;

use auth_handler::{Secret, SecretId, SecretResolver};
use github_client::{RepositoriesEvent, RepositoryClient, RepositoryClientFactory, WebhookEnvelope};
use http::StatusCode;
use secrecy::ExposeSecret;
use tracing::{debug, error, info, instrument, warn};

use crate::config::HandlerConfig;
use crate::errors::{UpstreamOperation, WebhookError};

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;

/// Successful result of handling a delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The default branch was protected and the notification issue filed.
    Protected {
        owner: String,
        repository: String,
        branch: String,
    },
    /// The delivery was not a repository creation; nothing was done.
    ///
    /// `action` is `None` for deliveries without one, such as `ping`.
    Ignored { action: Option<String> },
}

impl WebhookOutcome {
    /// The HTTP status the receiver answers with.
    ///
    /// Ignored events answer `304 Not Modified` to signal that nothing changed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookOutcome::Protected { .. } => StatusCode::OK,
            WebhookOutcome::Ignored { .. } => StatusCode::NOT_MODIFIED,
        }
    }
}

/// Protects the default branch of newly created repositories.
///
/// The handler holds no mutable state; share it between requests with an
/// `Arc`. Secrets are resolved on every call.
pub struct WebhookHandler {
    config: HandlerConfig,
    secrets: Arc<dyn SecretResolver>,
    clients: Arc<dyn RepositoryClientFactory>,
}

impl WebhookHandler {
    pub fn new(
        config: HandlerConfig,
        secrets: Arc<dyn SecretResolver>,
        clients: Arc<dyn RepositoryClientFactory>,
    ) -> Self {
        Self {
            config,
            secrets,
            clients,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handles one webhook delivery.
    ///
    /// # Arguments
    ///
    /// * `body` - The raw request body, exactly as received.
    /// * `signature` - The value of the `x-hub-signature-256` header, if any.
    ///
    /// The steps run strictly in order and stop at the first failure:
    /// resolve the signature secret, verify the signature, read the action,
    /// skip anything but `created`, parse the repository event, resolve the
    /// token, protect the default branch, file the notification issue.
    ///
    /// Only the action is read before filtering, so deliveries that are not
    /// `created` are skipped whatever else their payload contains.
    ///
    /// Protection and notification are not atomic: if filing the issue fails
    /// the protection stays in place.
    ///
    /// # Errors
    ///
    /// See [`WebhookError`] for the failure cases and their HTTP statuses.
    #[instrument(skip(self, body, signature), fields(body_length = body.len()))]
    pub async fn handle(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, WebhookError> {
        let signature_secret = self.resolve(SecretId::SignatureSecret).await?;
        if !auth_handler::verify(signature_secret.value.expose_secret(), body, signature) {
            warn!(
                signature_present = signature.is_some(),
                "Rejected delivery with invalid signature"
            );
            return Err(WebhookError::SignatureMismatch);
        }
        debug!(signature = signature.unwrap_or_default(), "Webhook signature verified");

        let envelope: WebhookEnvelope = serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, "Failed to parse webhook payload");
            WebhookError::MalformedPayload(e)
        })?;

        if !envelope.is_created() {
            info!(
                action = envelope.action.as_deref().unwrap_or("<none>"),
                "Skip subsequent processing because the action is not \"created\""
            );
            return Ok(WebhookOutcome::Ignored {
                action: envelope.action,
            });
        }

        let event: RepositoriesEvent = serde_json::from_slice(body).map_err(|e| {
            error!(error = %e, "Failed to parse repository event");
            WebhookError::MalformedPayload(e)
        })?;

        let repository = event.repository;
        let owner = repository.owner.login;
        let branch = repository.default_branch;
        info!(
            owner = %owner,
            repository = %repository.name,
            default_branch = %branch,
            "Repository created, applying branch protection"
        );

        let token = self.resolve(SecretId::Token).await?;
        let client = self
            .clients
            .create_client(&token.value)
            .map_err(|source| WebhookError::Upstream {
                operation: UpstreamOperation::ClientSetup,
                source,
            })?;

        client
            .update_branch_protection(&owner, &repository.name, &branch, &self.config.policy)
            .await
            .map_err(|source| {
                error!(
                    owner = %owner,
                    repository = %repository.name,
                    error = %source,
                    "Failed to protect default branch"
                );
                WebhookError::Upstream {
                    operation: UpstreamOperation::BranchProtection,
                    source,
                }
            })?;

        client
            .create_issue(&owner, &repository.name, &self.config.issue)
            .await
            .map_err(|source| {
                error!(
                    owner = %owner,
                    repository = %repository.name,
                    error = %source,
                    "Failed to file notification issue"
                );
                WebhookError::Upstream {
                    operation: UpstreamOperation::CreateIssue,
                    source,
                }
            })?;

        info!(
            owner = %owner,
            repository = %repository.name,
            default_branch = %branch,
            "Default branch protected and notification filed"
        );

        Ok(WebhookOutcome::Protected {
            owner,
            repository: repository.name,
            branch,
        })
    }

    async fn resolve(&self, id: SecretId) -> Result<Secret, WebhookError> {
        self.secrets.resolve_secret(id).await.map_err(|source| {
            error!(
                secret = %id,
                kind = ?source.kind,
                message = %source.message,
                "Secret resolution failed"
            );
            WebhookError::Secret { secret: id, source }
        })
    }
}
