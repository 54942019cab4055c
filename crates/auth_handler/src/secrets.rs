//! Secret resolution for the GitHub token and the webhook signature secret.
//!
//! Secrets are looked up fresh on every call; nothing is cached.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::key_vault::{KeyVaultSecretResolver, ManagedIdentityCredential};

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;

/// Environment variable selecting the secret source.
pub const ENVIRONMENT_MODE_VAR: &str = "AZURE_FUNCTIONS_ENVIRONMENT";

/// Value of [`ENVIRONMENT_MODE_VAR`] that selects environment-variable secrets.
pub const DEVELOPMENT_ENVIRONMENT: &str = "Development";

/// Vault used when no other URL is configured.
pub const DEFAULT_VAULT_URL: &str = "https://fumikeyvaultgithub.vault.azure.net/";

/// The secrets the receiver needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecretId {
    /// Token used to call the GitHub API
    Token,
    /// Shared secret GitHub signs webhook deliveries with
    SignatureSecret,
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretId::Token => write!(f, "token"),
            SecretId::SignatureSecret => write!(f, "signature secret"),
        }
    }
}

/// Where a secret lives in each source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretBinding {
    /// Environment variable read in development mode
    pub env_var: String,
    /// Secret name looked up in the vault
    pub vault_secret_name: String,
}

impl SecretBinding {
    pub fn new(env_var: impl Into<String>, vault_secret_name: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            vault_secret_name: vault_secret_name.into(),
        }
    }
}

/// Secret source configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretsConfig {
    /// Base URL of the Key Vault, e.g. `https://my-vault.vault.azure.net/`
    pub vault_url: String,
    pub token: SecretBinding,
    pub signature_secret: SecretBinding,
}

impl SecretsConfig {
    /// Returns the binding for a secret.
    pub fn binding(&self, id: SecretId) -> &SecretBinding {
        match id {
            SecretId::Token => &self.token,
            SecretId::SignatureSecret => &self.signature_secret,
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            vault_url: DEFAULT_VAULT_URL.to_string(),
            token: SecretBinding::new("PAT_TOKEN", "PatToken"),
            signature_secret: SecretBinding::new("SIGNATURE_SECRET", "SignatureSecret"),
        }
    }
}

/// A resolved secret.
///
/// The value is redacted from `Debug` output.
#[derive(Debug)]
pub struct Secret {
    /// Name the secret was resolved under (environment variable or vault secret name)
    pub name: String,
    pub value: SecretString,
}

/// Category of a secret resolution failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretErrorKind {
    /// The secret does not exist in the source
    NotFound,
    /// The caller may not read the secret
    Forbidden,
    /// Anything else, including transport failures and empty values
    Unknown,
}

/// Error type for secret resolution failures.
///
/// Security note: the message never includes secret values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SecretError {
    pub kind: SecretErrorKind,
    pub message: String,
}

impl SecretError {
    pub fn new(kind: SecretErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SecretErrorKind::NotFound, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(SecretErrorKind::Forbidden, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(SecretErrorKind::Unknown, message)
    }
}

/// Abstraction for resolving the receiver's secrets.
///
/// # Security
/// - Secret values MUST NOT be logged
/// - Secret values MUST NOT be included in error messages
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Resolves a secret to its current value.
    ///
    /// Exactly one lookup is attempted; failures are never retried.
    async fn resolve_secret(&self, id: SecretId) -> Result<Secret, SecretError>;
}

/// Which source secrets are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretMode {
    /// Environment variables, for local development
    Development,
    /// Azure Key Vault through the ambient managed identity
    Vault,
}

impl SecretMode {
    /// Maps the Functions host environment name to a mode.
    ///
    /// Only the exact value `Development` selects environment variables.
    pub fn from_environment_name(name: Option<&str>) -> Self {
        match name {
            Some(DEVELOPMENT_ENVIRONMENT) => SecretMode::Development,
            _ => SecretMode::Vault,
        }
    }

    /// Reads [`ENVIRONMENT_MODE_VAR`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_environment_name(std::env::var(ENVIRONMENT_MODE_VAR).ok().as_deref())
    }
}

/// Builds the resolver for a mode.
///
/// # Errors
///
/// Returns a `SecretErrorKind::Unknown` error if the vault URL or the managed
/// identity endpoint is malformed.
pub fn resolver_for_mode(
    mode: SecretMode,
    config: SecretsConfig,
) -> Result<Arc<dyn SecretResolver>, SecretError> {
    match mode {
        SecretMode::Development => {
            info!("Resolving secrets from environment variables");
            Ok(Arc::new(EnvironmentSecretResolver::new(config)))
        }
        SecretMode::Vault => {
            info!(vault_url = %config.vault_url, "Resolving secrets from Key Vault");
            let credential = ManagedIdentityCredential::from_env()?;
            Ok(Arc::new(KeyVaultSecretResolver::new(config, credential)?))
        }
    }
}

/// Resolves secrets from environment variables.
///
/// Variables are read at resolve time, so changes to the environment are
/// picked up by the next request.
///
/// # Example
/// ```no_run
/// use auth_handler::{EnvironmentSecretResolver, SecretId, SecretResolver, SecretsConfig};
///
/// # async fn example() {
/// let resolver = EnvironmentSecretResolver::new(SecretsConfig::default());
/// let secret = resolver.resolve_secret(SecretId::Token).await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentSecretResolver {
    config: SecretsConfig,
}

impl EnvironmentSecretResolver {
    pub fn new(config: SecretsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SecretResolver for EnvironmentSecretResolver {
    async fn resolve_secret(&self, id: SecretId) -> Result<Secret, SecretError> {
        let env_var = &self.config.binding(id).env_var;
        match std::env::var(env_var) {
            Ok(value) if !value.is_empty() => {
                debug!(secret = %id, env_var = %env_var, "Resolved secret from environment");
                Ok(Secret {
                    name: env_var.clone(),
                    value: SecretString::from(value),
                })
            }
            _ => {
                warn!(secret = %id, env_var = %env_var, "Secret missing from environment");
                Err(SecretError::unknown("Unable to load value from local env."))
            }
        }
    }
}
