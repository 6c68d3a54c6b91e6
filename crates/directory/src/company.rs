//! Company entity and the company-facts value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_core::{AdminId, CompanyId, DomainError, DomainResult, Entity, RequestId, ValueObject};

/// Opaque reference to an uploaded logo, handed out by the external
/// file-storage collaborator. Stored and forwarded, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoRef(pub String);

impl LogoRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The facts an applicant states about their company.
///
/// Shared between the registration snapshot (immutable copy) and the live
/// [`Company`] row materialized at approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFacts {
    pub name: String,
    pub registration_number: String,
    pub industry: String,
    pub description: Option<String>,
    pub branches: Vec<String>,
    pub tax_number: Option<String>,
    pub size: String,
    pub linkedin: Option<String>,
    pub logo_ref: Option<LogoRef>,
}

impl CompanyFacts {
    /// Validate the required facts, returning every missing field at once.
    pub fn validate(&self) -> DomainResult<()> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("company_name");
        }
        if self.registration_number.trim().is_empty() {
            missing.push("registration_number");
        }
        if self.industry.trim().is_empty() {
            missing.push("industry");
        }
        if self.size.trim().is_empty() {
            missing.push("size");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(missing))
        }
    }
}

impl ValueObject for CompanyFacts {}

/// A live, onboarded company.
///
/// # Invariants
/// - `origin_request_id` points at the registration request that produced
///   this company; at most one company ever exists per request
///   (store-enforced uniqueness, which is what makes concurrent
///   double-approval resolve to a single winner).
/// - `admin_id` points at the administrator account that owns the company;
///   exactly one admin per company at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub facts: CompanyFacts,
    pub origin_request_id: RequestId,
    pub admin_id: AdminId,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(
        id: CompanyId,
        facts: CompanyFacts,
        origin_request_id: RequestId,
        admin_id: AdminId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        facts.validate()?;
        Ok(Self {
            id,
            facts,
            origin_request_id,
            admin_id,
            created_at: now,
        })
    }
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_facts() -> CompanyFacts {
        CompanyFacts {
            name: "Acme".into(),
            registration_number: "123".into(),
            industry: "Tech".into(),
            description: None,
            branches: vec!["Riyadh".into()],
            tax_number: None,
            size: "50".into(),
            linkedin: None,
            logo_ref: None,
        }
    }

    #[test]
    fn company_requires_valid_facts() {
        let mut facts = sample_facts();
        facts.name = " ".into();
        facts.size = String::new();
        let err = Company::new(
            CompanyId::new(),
            facts,
            RequestId::new(),
            AdminId::new(),
            Utc::now(),
        )
        .unwrap_err();
        match err {
            DomainError::Validation { fields } => {
                assert_eq!(fields, vec!["company_name", "size"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn company_keeps_its_origin_and_admin() {
        let req = RequestId::new();
        let admin = AdminId::new();
        let c = Company::new(CompanyId::new(), sample_facts(), req, admin, Utc::now()).unwrap();
        assert_eq!(c.origin_request_id, req);
        assert_eq!(c.admin_id, admin);
    }
}
