//! Branch Guard HTTP API
//!
//! This crate provides the HTTP boundary of Branch Guard: it receives GitHub
//! `repository` webhooks and hands them to [`branch_guard_core::WebhookHandler`].
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - HTTP request/response translation
//! - Error mapping from domain to HTTP
//! - Routing, middleware and server configuration
//! - Startup configuration and metrics
//!
//! **CRITICAL**: This crate must never be imported by business logic.
//! The dependency flows: HTTP API → Business Logic, never the reverse.

use std::sync::Arc;

use branch_guard_core::WebhookHandler;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use config::{AppConfig, ConfigError, LogFormat};
pub use errors::{ApiError, ErrorResponse};
pub use metrics::WebhookMetrics;
pub use routes::{create_router, WEBHOOK_PATH};
pub use server::{ApiConfig, ApiServer, ShutdownSignal};

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<WebhookHandler>,
    pub metrics: Arc<WebhookMetrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(handler: WebhookHandler, metrics: WebhookMetrics) -> Self {
        Self {
            handler: Arc::new(handler),
            metrics: Arc::new(metrics),
        }
    }
}
