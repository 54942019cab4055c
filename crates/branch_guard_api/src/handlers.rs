//! HTTP request handlers
//!
//! Handlers extract HTTP inputs, delegate to [`branch_guard_core::WebhookHandler`]
//! and translate the result into a response.

use auth_handler::SIGNATURE_HEADER;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    errors::ApiError,
    metrics::{OUTCOME_IGNORED, OUTCOME_PROTECTED},
    models::{HealthCheckResponse, WebhookResponse},
    AppState,
};

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;

/// POST /api/httpTrigger1
///
/// Receives a GitHub `repository` webhook delivery.
///
/// Answers 200 with a [`WebhookResponse`] once the default branch is protected
/// and the notification filed, 304 without a body for actions other than
/// `created`, and an error response otherwise.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = match state.handler.handle(&body, signature).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.metrics.record(e.code());
            return Err(ApiError::from(e));
        }
    };

    match WebhookResponse::from_outcome(&outcome) {
        Some(response) => {
            state.metrics.record(OUTCOME_PROTECTED);
            Ok((outcome.status_code(), Json(response)).into_response())
        }
        None => {
            state.metrics.record(OUTCOME_IGNORED);
            Ok(outcome.status_code().into_response())
        }
    }
}

/// GET /api/health
///
/// Health check endpoint.
///
/// Returns service health status with version and timestamp.
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/metrics
///
/// Prometheus text exposition of the webhook counters.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
