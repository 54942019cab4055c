//! Azure Key Vault secret resolution.
//!
//! Access tokens come from the platform's managed identity: the App Service /
//! Functions identity endpoint when the host provides one, the instance
//! metadata service (IMDS) otherwise. Secrets are then read with the Key Vault
//! REST API.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::secrets::{Secret, SecretError, SecretId, SecretResolver, SecretsConfig};

#[cfg(test)]
#[path = "key_vault_tests.rs"]
mod tests;

/// Key Vault REST API version.
pub const KEY_VAULT_API_VERSION: &str = "7.4";

/// Token audience for Key Vault.
pub const KEY_VAULT_RESOURCE: &str = "https://vault.azure.net";

/// Default IMDS token endpoint.
pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

const APP_SERVICE_API_VERSION: &str = "2019-08-01";
const IMDS_API_VERSION: &str = "2018-02-01";

#[derive(Debug, Clone)]
enum IdentityEndpoint {
    AppService { endpoint: Url, header: SecretString },
    Imds { endpoint: Url },
}

/// Acquires access tokens from the ambient managed identity.
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    endpoint: IdentityEndpoint,
    client_id: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

impl ManagedIdentityCredential {
    /// Credential backed by the App Service / Functions identity endpoint.
    pub fn app_service(endpoint: Url, header: SecretString) -> Self {
        Self {
            endpoint: IdentityEndpoint::AppService { endpoint, header },
            client_id: None,
        }
    }

    /// Credential backed by the instance metadata service.
    pub fn imds(endpoint: Url) -> Self {
        Self {
            endpoint: IdentityEndpoint::Imds { endpoint },
            client_id: None,
        }
    }

    /// Selects a user-assigned identity.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Builds the credential from the variables the Azure host sets.
    ///
    /// `IDENTITY_ENDPOINT` together with `IDENTITY_HEADER` selects the App
    /// Service endpoint; otherwise IMDS is used. `AZURE_CLIENT_ID`, when set,
    /// selects a user-assigned identity.
    pub fn from_env() -> Result<Self, SecretError> {
        let endpoint = std::env::var("IDENTITY_ENDPOINT").ok();
        let header = std::env::var("IDENTITY_HEADER").ok();

        let credential = match (endpoint, header) {
            (Some(endpoint), Some(header)) => {
                Self::app_service(parse_url(&endpoint)?, SecretString::from(header))
            }
            _ => Self::imds(parse_url(IMDS_TOKEN_ENDPOINT)?),
        };

        Ok(match std::env::var("AZURE_CLIENT_ID") {
            Ok(client_id) if !client_id.is_empty() => credential.with_client_id(client_id),
            _ => credential,
        })
    }

    /// Requests an access token for `resource`.
    #[instrument(skip(self, http))]
    pub async fn get_token(
        &self,
        http: &reqwest::Client,
        resource: &str,
    ) -> Result<SecretString, SecretError> {
        let mut query = vec![("resource", resource)];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        let request = match &self.endpoint {
            IdentityEndpoint::AppService { endpoint, header } => {
                query.push(("api-version", APP_SERVICE_API_VERSION));
                http.get(endpoint.clone())
                    .header("X-IDENTITY-HEADER", header.expose_secret())
            }
            IdentityEndpoint::Imds { endpoint } => {
                query.push(("api-version", IMDS_API_VERSION));
                http.get(endpoint.clone()).header("Metadata", "true")
            }
        };

        let response = request.query(&query).send().await.map_err(|e| {
            error!(error = %e, "Failed to reach the managed identity endpoint");
            SecretError::unknown(format!("Failed to acquire a managed identity token: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Managed identity endpoint rejected the request");
            return Err(error_for_status(status, "Managed identity token request"));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Managed identity endpoint returned an unreadable token");
            SecretError::unknown("Managed identity endpoint returned an unreadable token.")
        })?;

        Ok(SecretString::from(token.access_token))
    }
}

/// Resolves secrets from Azure Key Vault.
///
/// # Example
/// ```no_run
/// use auth_handler::{KeyVaultSecretResolver, ManagedIdentityCredential, SecretId, SecretResolver, SecretsConfig};
///
/// # async fn example() {
/// let credential = ManagedIdentityCredential::from_env().unwrap();
/// let resolver = KeyVaultSecretResolver::new(SecretsConfig::default(), credential).unwrap();
/// let secret = resolver.resolve_secret(SecretId::SignatureSecret).await.unwrap();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KeyVaultSecretResolver {
    http: reqwest::Client,
    vault_url: Url,
    config: SecretsConfig,
    credential: ManagedIdentityCredential,
}

impl KeyVaultSecretResolver {
    /// Creates a resolver for the vault in `config.vault_url`.
    ///
    /// # Errors
    ///
    /// Returns a `SecretErrorKind::Unknown` error if the vault URL is malformed.
    pub fn new(
        config: SecretsConfig,
        credential: ManagedIdentityCredential,
    ) -> Result<Self, SecretError> {
        let vault_url = parse_url(&config.vault_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            vault_url,
            config,
            credential,
        })
    }

    fn secret_url(&self, name: &str) -> Result<Url, SecretError> {
        self.vault_url
            .join(&format!("secrets/{}", name))
            .map_err(|e| SecretError::unknown(format!("Invalid Key Vault secret URL: {}", e)))
    }
}

#[async_trait]
impl SecretResolver for KeyVaultSecretResolver {
    #[instrument(skip(self))]
    async fn resolve_secret(&self, id: SecretId) -> Result<Secret, SecretError> {
        let name = &self.config.binding(id).vault_secret_name;
        let token = self.credential.get_token(&self.http, KEY_VAULT_RESOURCE).await?;

        let url = self.secret_url(name)?;
        debug!(secret = %id, secret_name = %name, "Requesting secret from Key Vault");

        let response = self
            .http
            .get(url)
            .query(&[("api-version", KEY_VAULT_API_VERSION)])
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                error!(secret = %id, error = %e, "Failed to reach Key Vault");
                SecretError::unknown(format!("Failed to reach Key Vault: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                secret = %id,
                secret_name = %name,
                status = status.as_u16(),
                "Key Vault rejected the secret request"
            );
            return Err(error_for_status(status, "Key Vault secret request"));
        }

        let bundle: SecretBundle = response.json().await.map_err(|e| {
            error!(secret = %id, error = %e, "Key Vault returned an unreadable secret");
            SecretError::unknown("Unable to load value from Key Vault.")
        })?;

        match bundle.value {
            Some(value) if !value.is_empty() => Ok(Secret {
                name: name.clone(),
                value: SecretString::from(value),
            }),
            _ => {
                warn!(secret = %id, secret_name = %name, "Key Vault secret has no value");
                Err(SecretError::unknown("Unable to load value from Key Vault."))
            }
        }
    }
}

fn error_for_status(status: StatusCode, context: &str) -> SecretError {
    let message = format!("{} failed with status {}", context, status.as_u16());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SecretError::forbidden(message),
        StatusCode::NOT_FOUND => SecretError::not_found(message),
        _ => SecretError::unknown(message),
    }
}

fn parse_url(value: &str) -> Result<Url, SecretError> {
    Url::parse(value).map_err(|e| SecretError::unknown(format!("Invalid URL '{}': {}", value, e)))
}
