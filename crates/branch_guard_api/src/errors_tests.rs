//! Tests for errors module

use super::*;
use auth_handler::{SecretError, SecretId};
use branch_guard_core::UpstreamOperation;
use http_body_util::BodyExt;

async fn body_of(response: Response) -> ErrorResponse {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signature_mismatch_response() {
    let response = ApiError::from(WebhookError::SignatureMismatch).into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_of(response).await;
    assert_eq!(body.error.code, "SignatureMismatch");
    assert_eq!(
        body.error.message,
        "\"x-hub-signature-256\" header signature and calculated signature didn't match."
    );
}

#[tokio::test]
async fn test_secret_error_uses_kind_status() {
    let error = WebhookError::Secret {
        secret: SecretId::SignatureSecret,
        source: SecretError::forbidden("Access to the vault was denied"),
    };

    let response = ApiError::from(error).into_response();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_of(response).await;
    assert_eq!(body.error.code, "SecretResolutionError");
    assert_eq!(
        body.error.message,
        "Unable to resolve the signature secret: Access to the vault was denied"
    );
}

#[tokio::test]
async fn test_upstream_error_is_internal() {
    let error = WebhookError::Upstream {
        operation: UpstreamOperation::CreateIssue,
        source: github_client::Error::UnexpectedStatus(410),
    };

    let response = ApiError::from(error).into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_of(response).await.error.code, "UpstreamError");
}

#[tokio::test]
async fn test_panic_response_with_string_payload() {
    let response = panic_response(Box::new("boom".to_string()));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_of(response).await,
        ErrorResponse::new("InternalError", "An internal error occurred")
    );
}

#[tokio::test]
async fn test_panic_response_with_opaque_payload() {
    let response = panic_response(Box::new(42_u32));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_error_response_shape() {
    let value = serde_json::to_value(ErrorResponse::new("Code", "Message")).unwrap();

    assert_eq!(
        value,
        serde_json::json!({ "error": { "code": "Code", "message": "Message" } })
    );
}
