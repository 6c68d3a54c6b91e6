use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use onboard_core::RequestId;
use onboard_registration::RequestStatus;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

/// Applicant-facing: submission is open to the world.
pub fn public_router() -> Router {
    Router::new().route("/registration-requests", post(submit))
}

/// Owner-facing review surface.
pub fn review_router() -> Router {
    Router::new()
        .route("/registration-requests", get(list))
        .route("/registration-requests/:id", get(get_one))
        .route("/registration-requests/:id/approve", post(approve))
        .route("/registration-requests/:id/reject", post(reject))
}

pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SubmitRegistrationRequest>,
) -> axum::response::Response {
    match services.registration.submit(body.into()) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string(), "status": "pending" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> axum::response::Response {
    if let Err(resp) = require_owner(&ctx) {
        return resp;
    }

    let status = match query.status.as_deref() {
        None => None,
        Some("pending") => Some(RequestStatus::Pending),
        Some("approved") => Some(RequestStatus::Approved),
        Some("rejected") => Some(RequestStatus::Rejected),
        Some(other) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_status",
                format!("status must be pending, approved or rejected, got {other}"),
            )
        }
    };

    match services.registration.list(status) {
        Ok(items) => {
            let items: Vec<_> = items.iter().map(dto::request_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_owner(&ctx) {
        return resp;
    }
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid request id")
        }
    };

    match services.registration.get(id) {
        Ok(request) => (StatusCode::OK, Json(dto::request_to_json(&request))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn approve(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let reviewer = match ctx.owner_id() {
        Ok(id) => id,
        Err(_) => return forbidden(),
    };
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid request id")
        }
    };

    match services.registration.approve(id, reviewer) {
        Ok(ids) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "request_id": id.to_string(),
                "employee_id": ids.employee_id.to_string(),
                "company_id": ids.company_id.to_string(),
                "admin_id": ids.admin_id.to_string(),
            })),
        )
            .into_response(),
        Err(e) => errors::approval_error_to_response(e),
    }
}

pub async fn reject(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let reviewer = match ctx.owner_id() {
        Ok(id) => id,
        Err(_) => return forbidden(),
    };
    let id: RequestId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid request id")
        }
    };

    match services.registration.reject(id, reviewer) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": id.to_string(), "status": "rejected" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub(crate) fn require_owner(ctx: &AuthContext) -> Result<(), axum::response::Response> {
    ctx.owner_id().map(|_| ()).map_err(|_| forbidden())
}

fn forbidden() -> axum::response::Response {
    errors::json_error(StatusCode::FORBIDDEN, "forbidden", "owner role required")
}
