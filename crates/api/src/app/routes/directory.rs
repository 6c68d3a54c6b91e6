//! Read-only inspection of provisioned entities (owner only).

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use onboard_core::{AdminId, CompanyId, EmployeeId};
use onboard_infra::store::{CompanyStore, EmployeeStore, RoleAccountStore};

use crate::app::routes::registration::require_owner;
use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/companies/:id", get(get_company))
        .route("/employees/:id", get(get_employee))
        .route("/admins/:id", get(get_admin))
}

pub async fn get_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_owner(&ctx) {
        return resp;
    }
    let id: CompanyId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid company id")
        }
    };

    match services.store.get_company(id) {
        Ok(Some(company)) => {
            (StatusCode::OK, Json(dto::company_to_json(&company))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "company not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_owner(&ctx) {
        return resp;
    }
    let id: EmployeeId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid employee id")
        }
    };

    match services.store.get_employee(id) {
        Ok(Some(employee)) => {
            (StatusCode::OK, Json(dto::employee_to_json(&employee))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "employee not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_admin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_owner(&ctx) {
        return resp;
    }
    let id: AdminId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid admin id")
        }
    };

    match services.store.get_admin(id) {
        Ok(Some(admin)) => (StatusCode::OK, Json(dto::admin_to_json(&admin))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "admin not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}
