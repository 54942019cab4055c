//! HTTP routing configuration
//!
//! # Route Structure
//!
//! - POST   /api/httpTrigger1 - Receive a repository webhook
//! - GET    /api/health - Health check
//! - GET    /api/metrics - Prometheus metrics
//!
//! The webhook route keeps the Azure Functions custom handler path so the
//! binary can run behind the Functions host unchanged.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{errors, handlers, middleware as api_middleware, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Path GitHub delivers webhooks to.
pub const WEBHOOK_PATH: &str = "/api/httpTrigger1";

/// Create the complete API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route(WEBHOOK_PATH, post(handlers::receive_webhook))
        .route("/api/health", get(handlers::health_check))
        .route("/api/metrics", get(handlers::metrics))
        .with_state(state);

    with_middleware(routes)
}

/// Adds the middleware stack shared by all routes.
///
/// Outermost first: panic recovery, HTTP tracing, request IDs.
pub(crate) fn with_middleware(router: Router) -> Router {
    // Request headers are not recorded; they carry the webhook signature
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(false))
        .on_response(DefaultOnResponse::new().include_headers(false));

    router
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(trace_layer)
        .layer(CatchPanicLayer::custom(errors::panic_response))
}
