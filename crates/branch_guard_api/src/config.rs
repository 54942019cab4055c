//! Startup configuration
//!
//! Everything the receiver needs is read from the environment once, at
//! startup, into [`AppConfig`] and passed on explicitly from there.
//!
//! # Environment Variables
//!
//! - `FUNCTIONS_CUSTOMHANDLER_PORT`: Port assigned by the Azure Functions host (takes precedence)
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `AZURE_FUNCTIONS_ENVIRONMENT`: `Development` reads secrets from environment variables
//! - `KEY_VAULT_URL`: Key Vault base URL
//! - `GITHUB_API_URL`: GitHub API base URL (default: https://api.github.com)
//! - `NOTIFIED_USER`: User mentioned in the notification issue (default: shiroyama)
//! - `LOG_FORMAT`: `json` for JSON log lines, anything else for text

use auth_handler::{SecretMode, SecretsConfig};
use branch_guard_core::DEFAULT_NOTIFIED_USER;
use github_client::DEFAULT_API_BASE_URI;
use thiserror::Error;

use crate::server::ApiConfig;
use crate::{DEFAULT_HOST, DEFAULT_PORT};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Port variable set by the Azure Functions custom handler host.
pub const FUNCTIONS_PORT_VAR: &str = "FUNCTIONS_CUSTOMHANDLER_PORT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port in {variable}: '{value}'")]
    InvalidPort { variable: String, value: String },

    #[error("{variable} must not be empty")]
    Empty { variable: String },
}

/// Complete receiver configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub secret_mode: SecretMode,
    pub secrets: SecretsConfig,
    pub github_api_url: String,
    pub notified_user: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match (lookup(FUNCTIONS_PORT_VAR), lookup("API_PORT")) {
            (Some(value), _) => parse_port(FUNCTIONS_PORT_VAR, &value)?,
            (None, Some(value)) => parse_port("API_PORT", &value)?,
            (None, None) => DEFAULT_PORT,
        };
        let host = lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let secret_mode = SecretMode::from_environment_name(
            lookup(auth_handler::secrets::ENVIRONMENT_MODE_VAR).as_deref(),
        );

        let mut secrets = SecretsConfig::default();
        if let Some(url) = lookup("KEY_VAULT_URL") {
            secrets.vault_url = non_empty("KEY_VAULT_URL", url)?;
        }

        let github_api_url = match lookup("GITHUB_API_URL") {
            Some(url) => non_empty("GITHUB_API_URL", url)?,
            None => DEFAULT_API_BASE_URI.to_string(),
        };

        let notified_user = match lookup("NOTIFIED_USER") {
            Some(user) => non_empty("NOTIFIED_USER", user)?,
            None => DEFAULT_NOTIFIED_USER.to_string(),
        };

        Ok(Self {
            api: ApiConfig { port, host },
            secret_mode,
            secrets,
            github_api_url,
            notified_user,
            log_format: LogFormat::from_name(lookup("LOG_FORMAT").as_deref()),
        })
    }
}

fn parse_port(variable: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidPort {
        variable: variable.to_string(),
        value: value.to_string(),
    })
}

fn non_empty(variable: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty {
            variable: variable.to_string(),
        });
    }
    Ok(value)
}
