use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use onboard_auth::AuthError;
use onboard_core::DomainError;
use onboard_infra::ApprovalError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation { fields } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": "missing or invalid fields",
                "fields": fields,
            })),
        )
            .into_response(),
        DomainError::Duplicate(msg) => json_error(StatusCode::CONFLICT, "duplicate", msg),
        DomainError::InvalidState(msg) => json_error(StatusCode::CONFLICT, "invalid_state", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Timeout => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_timeout", "store timeout; retry")
        }
    }
}

pub fn approval_error_to_response(err: ApprovalError) -> axum::response::Response {
    match err {
        ApprovalError::Domain(e) => domain_error_to_response(e),
        // Compensation already ran; the request is still pending.
        ApprovalError::Provisioning(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "provisioning_failed",
            e.to_string(),
        ),
    }
}

/// Every credential failure renders identically so a caller cannot probe
/// which part of the check failed.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::NotFound | AuthError::BadCredential | AuthError::Invalid => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid credentials")
        }
        AuthError::Domain(e) => domain_error_to_response(e),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
