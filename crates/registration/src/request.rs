//! Registration request entity and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_auth::accounts::normalize_login_email;
use onboard_core::{DomainError, DomainResult, Entity, OwnerId, RequestId, ValueObject};
use onboard_directory::CompanyFacts;

/// Review status of a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The proposed administrator credential inside an application.
///
/// `password_hash` is a credential-store digest; the plaintext never
/// reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminApplication {
    pub login_email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// The immutable application snapshot embedded in a request.
///
/// Written once at submission; review only ever touches the request's
/// status/review metadata, never this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSnapshot {
    pub company: CompanyFacts,
    pub admin: AdminApplication,
}

impl ValueObject for ApplicationSnapshot {}

/// A company's registration application under review.
///
/// # Lifecycle
/// `pending` → `approved` (terminal, provisioning ran) or `pending` →
/// `rejected` (terminal, no side effects). Terminal states accept no
/// further transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub id: RequestId,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<OwnerId>,
    pub application: ApplicationSnapshot,
}

impl RegistrationRequest {
    /// Build a new pending request from an application.
    ///
    /// Validates every required field and reports all missing ones in a
    /// single `Validation` error. The proposed-admin email is normalized
    /// into the snapshot. Duplicate-email detection is a store concern.
    pub fn submit(
        id: RequestId,
        company: CompanyFacts,
        mut admin: AdminApplication,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut missing: Vec<String> = match company.validate() {
            Ok(()) => Vec::new(),
            Err(DomainError::Validation { fields }) => fields,
            Err(other) => return Err(other),
        };

        match normalize_login_email(&admin.login_email) {
            Ok(email) => admin.login_email = email,
            Err(_) => missing.push("admin_email".to_string()),
        }
        if admin.password_hash.is_empty() {
            missing.push("admin_password".to_string());
        }

        if !missing.is_empty() {
            return Err(DomainError::validation(missing));
        }

        Ok(Self {
            id,
            status: RequestStatus::Pending,
            submitted_at: now,
            reviewed_at: None,
            reviewed_by: None,
            application: ApplicationSnapshot { company, admin },
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    fn ensure_pending(&self, action: &str) -> DomainResult<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::invalid_state(format!(
                "cannot {action} a request in status {}",
                self.status
            )))
        }
    }

    /// `pending → approved`. The caller (provisioning engine) is
    /// responsible for the side effects; this only moves the status.
    pub fn approve(&mut self, reviewer: OwnerId, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending("approve")?;
        self.status = RequestStatus::Approved;
        self.reviewed_at = Some(now);
        self.reviewed_by = Some(reviewer);
        Ok(())
    }

    /// `pending → rejected`. No further side effects.
    pub fn reject(&mut self, reviewer: OwnerId, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_pending("reject")?;
        self.status = RequestStatus::Rejected;
        self.reviewed_at = Some(now);
        self.reviewed_by = Some(reviewer);
        Ok(())
    }
}

impl Entity for RegistrationRequest {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_directory::company::LogoRef;
    use proptest::prelude::*;

    fn sample_facts() -> CompanyFacts {
        CompanyFacts {
            name: "Acme".into(),
            registration_number: "123".into(),
            industry: "Tech".into(),
            description: Some("Widgets".into()),
            branches: vec!["Riyadh".into(), "Jeddah".into()],
            tax_number: Some("T-99".into()),
            size: "50".into(),
            linkedin: None,
            logo_ref: Some(LogoRef("logo-abc123.png".into())),
        }
    }

    fn sample_admin() -> AdminApplication {
        AdminApplication {
            login_email: "A@x.com".into(),
            password_hash: "$argon2id$fake".into(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            phone: None,
        }
    }

    fn pending_request() -> RegistrationRequest {
        RegistrationRequest::submit(RequestId::new(), sample_facts(), sample_admin(), Utc::now())
            .unwrap()
    }

    #[test]
    fn submit_normalizes_admin_email_and_starts_pending() {
        let r = pending_request();
        assert_eq!(r.status, RequestStatus::Pending);
        assert_eq!(r.application.admin.login_email, "a@x.com");
        assert!(r.reviewed_at.is_none());
        assert!(r.reviewed_by.is_none());
    }

    #[test]
    fn submit_reports_every_missing_field() {
        let mut facts = sample_facts();
        facts.name = String::new();
        facts.industry = "  ".into();
        let admin = AdminApplication {
            login_email: "nope".into(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            phone: None,
        };

        let err = RegistrationRequest::submit(RequestId::new(), facts, admin, Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation { fields } => {
                assert_eq!(
                    fields,
                    vec!["company_name", "industry", "admin_email", "admin_password"]
                );
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn approve_moves_to_terminal_and_stamps_review() {
        let mut r = pending_request();
        let reviewer = OwnerId::new();
        let now = Utc::now();

        r.approve(reviewer, now).unwrap();
        assert_eq!(r.status, RequestStatus::Approved);
        assert_eq!(r.reviewed_at, Some(now));
        assert_eq!(r.reviewed_by, Some(reviewer));
    }

    #[test]
    fn second_approve_is_invalid_state() {
        let mut r = pending_request();
        r.approve(OwnerId::new(), Utc::now()).unwrap();

        let err = r.approve(OwnerId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(r.status, RequestStatus::Approved);
    }

    #[test]
    fn rejected_request_cannot_be_approved() {
        let mut r = pending_request();
        r.reject(OwnerId::new(), Utc::now()).unwrap();

        let err = r.approve(OwnerId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(r.status, RequestStatus::Rejected);
    }

    #[derive(Debug, Clone, Copy)]
    enum Review {
        Approve,
        Reject,
    }

    proptest! {
        /// Any sequence of review actions lands in exactly one terminal
        /// state, with exactly one action succeeding, and never touches the
        /// application snapshot.
        #[test]
        fn at_most_one_review_succeeds(actions in proptest::collection::vec(
            prop_oneof![Just(Review::Approve), Just(Review::Reject)],
            1..8,
        )) {
            let mut r = pending_request();
            let snapshot = r.application.clone();
            let mut successes = 0;

            for action in &actions {
                let outcome = match action {
                    Review::Approve => r.approve(OwnerId::new(), Utc::now()),
                    Review::Reject => r.reject(OwnerId::new(), Utc::now()),
                };
                if outcome.is_ok() {
                    successes += 1;
                }
            }

            prop_assert_eq!(successes, 1);
            prop_assert!(r.status.is_terminal());
            prop_assert_eq!(&r.application, &snapshot);
        }
    }
}
