//! Error handling and HTTP error conversion
//!
//! Webhook failures from `branch_guard_core` are converted to HTTP responses
//! here, at the HTTP boundary. The status comes from
//! [`WebhookError::status_code`]; the body is always an [`ErrorResponse`].

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use branch_guard_core::WebhookError;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Standard error response for all API errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Axum response wrapper for webhook errors
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
///     let outcome = state.handler.handle(&body, None).await?;
///     Ok(outcome.status_code().into_response())
/// }
/// ```
#[derive(Debug)]
pub struct ApiError(pub WebhookError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        log_error(&self.0, status);

        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &WebhookError, status: StatusCode) {
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), code = error.code(), "API error: {}", error);
    } else {
        tracing::warn!(status = status.as_u16(), code = error.code(), "API error: {}", error);
    }
}

/// Converts a handler panic into a JSON 500 response.
///
/// Used with `CatchPanicLayer` so that every request still gets an answer.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    let body = ErrorResponse::new("InternalError", "An internal error occurred");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
