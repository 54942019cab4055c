//! Listener setup for the webhook receiver
//!
//! Under Azure Functions the host forwards each delivery to the port it
//! publishes in `FUNCTIONS_CUSTOMHANDLER_PORT`; standalone the receiver binds
//! `API_HOST:API_PORT`. Either way the process runs until the host stops it.

use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tokio::signal;

use crate::{routes, AppState, DEFAULT_HOST, DEFAULT_PORT};

/// Where the receiver listens for deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port assigned by the Functions host, or chosen by the operator
    pub port: u16,

    /// IP address to bind; hostnames are not resolved
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl ApiConfig {
    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid API_HOST '{}': {}", self.host, e))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// Signal that ended the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

/// The webhook receiver process.
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Webhook, health and metrics routes wrapped in the request middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Accepts deliveries until the Functions host (or the operator) stops
    /// the process with SIGINT or SIGTERM.
    ///
    /// In-flight deliveries finish before this returns, so a branch is never
    /// left protected without its notification issue because of a shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address is invalid or cannot be bound.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind webhook listener on {}", addr))?;

        tracing::info!(address = %addr, "Webhook receiver listening for deliveries");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async {
                let signal = shutdown_signal().await;
                tracing::info!(
                    signal = ?signal,
                    "Stopping webhook receiver after in-flight deliveries"
                );
            })
            .await
            .context("Webhook receiver failed")?;

        tracing::info!("Webhook receiver stopped");

        Ok(())
    }
}

async fn shutdown_signal() -> ShutdownSignal {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    first_signal(interrupt, terminate).await
}

/// Resolves with whichever of the two signal futures completes first.
async fn first_signal<I, T>(interrupt: I, terminate: T) -> ShutdownSignal
where
    I: Future<Output = ()>,
    T: Future<Output = ()>,
{
    tokio::select! {
        _ = interrupt => ShutdownSignal::Interrupt,
        _ = terminate => ShutdownSignal::Terminate,
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
