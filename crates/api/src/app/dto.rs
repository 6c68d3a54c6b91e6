//! Request/response DTOs and JSON mapping helpers.
//!
//! Password digests never leave through any of these mappers.

use serde::Deserialize;
use serde_json::json;

use onboard_auth::accounts::AdminAccount;
use onboard_directory::{Company, CompanyFacts, Employee, LogoRef};
use onboard_infra::NewApplication;
use onboard_registration::RegistrationRequest;

/// Submission body for `POST /registration-requests`.
#[derive(Debug, Deserialize)]
pub struct SubmitRegistrationRequest {
    pub company_name: String,
    pub registration_number: String,
    pub industry: String,
    pub size: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    /// Opaque reference from the upload collaborator, if a logo was stored.
    #[serde(default)]
    pub logo_ref: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    #[serde(default)]
    pub admin_first_name: Option<String>,
    #[serde(default)]
    pub admin_last_name: Option<String>,
    #[serde(default)]
    pub admin_phone: Option<String>,
}

impl From<SubmitRegistrationRequest> for NewApplication {
    fn from(body: SubmitRegistrationRequest) -> Self {
        NewApplication {
            company: CompanyFacts {
                name: body.company_name,
                registration_number: body.registration_number,
                industry: body.industry,
                description: body.description,
                branches: body.branches,
                tax_number: body.tax_number,
                size: body.size,
                linkedin: body.linkedin,
                logo_ref: body.logo_ref.map(LogoRef),
            },
            admin_email: body.admin_email,
            admin_password: body.admin_password,
            admin_first_name: body.admin_first_name,
            admin_last_name: body.admin_last_name,
            admin_phone: body.admin_phone,
        }
    }
}

/// Body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub role: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub session_id: String,
}

pub fn request_to_json(request: &RegistrationRequest) -> serde_json::Value {
    let company = &request.application.company;
    let admin = &request.application.admin;
    json!({
        "id": request.id.to_string(),
        "status": request.status.as_str(),
        "submitted_at": request.submitted_at,
        "reviewed_at": request.reviewed_at,
        "reviewed_by": request.reviewed_by.map(|id| id.to_string()),
        "company": {
            "name": company.name,
            "registration_number": company.registration_number,
            "industry": company.industry,
            "description": company.description,
            "branches": company.branches,
            "tax_number": company.tax_number,
            "size": company.size,
            "linkedin": company.linkedin,
            "logo_ref": company.logo_ref.as_ref().map(|l| l.as_str()),
        },
        "admin": {
            "login_email": admin.login_email,
            "first_name": admin.first_name,
            "last_name": admin.last_name,
            "phone": admin.phone,
        },
    })
}

pub fn company_to_json(company: &Company) -> serde_json::Value {
    json!({
        "id": company.id.to_string(),
        "name": company.facts.name,
        "registration_number": company.facts.registration_number,
        "industry": company.facts.industry,
        "description": company.facts.description,
        "branches": company.facts.branches,
        "tax_number": company.facts.tax_number,
        "size": company.facts.size,
        "linkedin": company.facts.linkedin,
        "logo_ref": company.facts.logo_ref.as_ref().map(|l| l.as_str()),
        "origin_request_id": company.origin_request_id.to_string(),
        "admin_id": company.admin_id.to_string(),
        "created_at": company.created_at,
    })
}

pub fn employee_to_json(employee: &Employee) -> serde_json::Value {
    json!({
        "id": employee.id.to_string(),
        "first_name": employee.first_name,
        "last_name": employee.last_name,
        "email": employee.email,
        "phone": employee.phone,
        "position": employee.position,
        "employee_code": employee.employee_code,
        "company_id": employee.company_id.map(|id| id.to_string()),
        "created_at": employee.created_at,
    })
}

pub fn admin_to_json(admin: &AdminAccount) -> serde_json::Value {
    json!({
        "id": admin.id.to_string(),
        "employee_id": admin.employee_id.to_string(),
        "login_email": admin.login_email,
        "created_at": admin.created_at,
    })
}
