//! Branch Guard webhook receiver
//!
//! Main binary for running the receiver, standalone or as an Azure Functions
//! custom handler. See [`branch_guard_api::config`] for the environment
//! variables it reads.

use std::sync::Arc;

use anyhow::Context;
use auth_handler::resolver_for_mode;
use branch_guard_api::{AppConfig, AppState, ApiServer, LogFormat, WebhookMetrics};
use branch_guard_core::{HandlerConfig, WebhookHandler};
use github_client::GitHubClientFactory;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;

    init_tracing(config.log_format);

    let secrets = resolver_for_mode(config.secret_mode, config.secrets.clone())
        .context("Failed to initialize secret resolver")?;
    let clients = Arc::new(GitHubClientFactory::new(config.github_api_url.clone()));
    let handler = WebhookHandler::new(
        HandlerConfig::for_user(&config.notified_user),
        secrets,
        clients,
    );
    let metrics = WebhookMetrics::new().context("Failed to register metrics")?;

    let state = AppState::new(handler, metrics);
    let server = ApiServer::new(config.api.clone(), state);

    tracing::info!("Starting Branch Guard webhook receiver");
    tracing::info!(
        secret_mode = ?config.secret_mode,
        github_api_url = %config.github_api_url,
        notified_user = %config.notified_user,
        "Configuration loaded"
    );

    // Start server with graceful shutdown
    server.serve().await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
