use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use onboard_auth::RoleKind;
use onboard_core::SessionId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    // An unknown role renders like any other bad credential; the login
    // surface leaks nothing about what exists.
    let Ok(role) = body.role.parse::<RoleKind>() else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        );
    };

    match services
        .sessions
        .authenticate(role, &body.email, &body.password)
    {
        Ok((session, token)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": token,
                "session_id": session.id.to_string(),
                "role": role.as_str(),
                "subject_id": session.subject.subject_uuid().to_string(),
            })),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LogoutRequest>,
) -> axum::response::Response {
    let session_id: SessionId = match body.session_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid session id")
        }
    };

    match services.sessions.logout(session_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "session_id": session_id.to_string(), "active": false })),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
