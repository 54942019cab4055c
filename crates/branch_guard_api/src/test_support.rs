//! Shared fixtures for the HTTP layer tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth_handler::{Secret, SecretError, SecretId, SecretResolver};
use branch_guard_core::{HandlerConfig, WebhookHandler};
use github_client::GitHubClientFactory;
use secrecy::SecretString;

use crate::{AppState, WebhookMetrics};

pub const SIGNING_SECRET: &str = "It's a Secret to Everybody";
pub const TOKEN: &str = "ghp_test_token";

/// Resolver returning fixed values or errors.
pub struct StaticSecrets {
    results: HashMap<SecretId, Result<String, SecretError>>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        let mut results = HashMap::new();
        results.insert(SecretId::SignatureSecret, Ok(SIGNING_SECRET.to_string()));
        results.insert(SecretId::Token, Ok(TOKEN.to_string()));
        Self { results }
    }

    pub fn failing(mut self, id: SecretId, error: SecretError) -> Self {
        self.results.insert(id, Err(error));
        self
    }
}

#[async_trait]
impl SecretResolver for StaticSecrets {
    async fn resolve_secret(&self, id: SecretId) -> Result<Secret, SecretError> {
        match self.results.get(&id) {
            Some(Ok(value)) => Ok(Secret {
                name: id.to_string(),
                value: SecretString::from(value.clone()),
            }),
            Some(Err(error)) => Err(error.clone()),
            None => Err(SecretError::not_found("no such secret")),
        }
    }
}

/// State whose GitHub client talks to `github_uri`.
pub fn app_state(secrets: StaticSecrets, github_uri: &str) -> AppState {
    let handler = WebhookHandler::new(
        HandlerConfig::default(),
        Arc::new(secrets),
        Arc::new(GitHubClientFactory::new(github_uri)),
    );
    AppState::new(handler, WebhookMetrics::new().unwrap())
}

/// State for tests that never reach GitHub.
pub fn offline_state() -> AppState {
    app_state(StaticSecrets::new(), "http://127.0.0.1:1")
}
