use super::*;
use std::error::Error as StdError;

fn secret_error(kind: SecretErrorKind) -> WebhookError {
    WebhookError::Secret {
        secret: SecretId::Token,
        source: SecretError::new(kind, "lookup failed"),
    }
}

#[test]
fn test_secret_error_status_by_kind() {
    assert_eq!(
        secret_error(SecretErrorKind::Forbidden).status_code(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        secret_error(SecretErrorKind::NotFound).status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        secret_error(SecretErrorKind::Unknown).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_secret_error_message_and_source() {
    let error = secret_error(SecretErrorKind::NotFound);

    assert_eq!(error.to_string(), "Unable to resolve the token: lookup failed");
    assert!(error.source().is_some());
    assert_eq!(error.code(), "SecretResolutionError");
}

#[test]
fn test_signature_mismatch_is_bad_request() {
    let error = WebhookError::SignatureMismatch;

    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error.to_string(),
        "\"x-hub-signature-256\" header signature and calculated signature didn't match."
    );
}

#[test]
fn test_malformed_payload_is_internal_error() {
    let json_error = serde_json::from_slice::<serde_json::Value>(b"not json").unwrap_err();
    let error = WebhookError::from(json_error);

    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error
        .to_string()
        .starts_with("Unable to process the request. Error: "));
}

#[test]
fn test_upstream_errors_are_internal_errors() {
    for operation in [
        UpstreamOperation::ClientSetup,
        UpstreamOperation::BranchProtection,
        UpstreamOperation::CreateIssue,
    ] {
        let error = WebhookError::Upstream {
            operation,
            source: github_client::Error::UnexpectedStatus(404),
        };

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code(), "UpstreamError");
    }
}

#[test]
fn test_upstream_error_message_names_operation() {
    let error = WebhookError::Upstream {
        operation: UpstreamOperation::BranchProtection,
        source: github_client::Error::UnexpectedStatus(422),
    };

    assert_eq!(
        error.to_string(),
        "Branch protection update failed: GitHub responded with unexpected status 422"
    );
}
