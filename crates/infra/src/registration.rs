//! Registration service: submission intake and review actions.
//!
//! Composes the credential store, the request store and the provisioning
//! engine: hashing happens here, before anything is persisted, so the
//! stored snapshot only ever carries a digest.

use std::sync::Arc;

use chrono::Utc;

use onboard_auth::CredentialStore;
use onboard_core::{DomainError, DomainResult, OwnerId, RequestId};
use onboard_directory::CompanyFacts;
use onboard_registration::{AdminApplication, RegistrationRequest, RequestStatus};

use crate::notify::{Notification, Notifier};
use crate::provisioning::{ApprovalError, Provisioned, ProvisioningEngine};
use crate::store::Store;

/// An incoming application, as the transport hands it over.
///
/// The only place in the system a plaintext password exists.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub company: CompanyFacts,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_first_name: Option<String>,
    pub admin_last_name: Option<String>,
    pub admin_phone: Option<String>,
}

pub struct RegistrationService<S> {
    store: Arc<S>,
    credentials: CredentialStore,
    engine: ProvisioningEngine<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Store> RegistrationService<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        let engine = ProvisioningEngine::new(store.clone(), notifier.clone());
        Self {
            store,
            credentials: CredentialStore::new(),
            engine,
            notifier,
        }
    }

    /// Accept an application and hold it pending review.
    pub fn submit(&self, application: NewApplication) -> DomainResult<RequestId> {
        let password_hash = if application.admin_password.is_empty() {
            // Leave the hash empty so the entity validation reports the
            // password among the other missing fields in one error.
            String::new()
        } else {
            self.credentials
                .hash(&application.admin_password)
                .map_err(|e| DomainError::conflict(format!("credential hashing failed: {e}")))?
        };

        let request = RegistrationRequest::submit(
            RequestId::new(),
            application.company,
            AdminApplication {
                login_email: application.admin_email,
                password_hash,
                first_name: application.admin_first_name,
                last_name: application.admin_last_name,
                phone: application.admin_phone,
            },
            Utc::now(),
        )?;
        let request_id = request.id;

        self.store.insert_request(request)?;
        self.notifier
            .notify(Notification::RegistrationSubmitted { request_id });
        tracing::info!(%request_id, "registration request submitted");
        Ok(request_id)
    }

    pub fn get(&self, id: RequestId) -> DomainResult<RegistrationRequest> {
        self.store.get_request(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list(&self, status: Option<RequestStatus>) -> DomainResult<Vec<RegistrationRequest>> {
        self.store.list_requests(status)
    }

    /// `pending → approved` + provisioning, all-or-nothing.
    pub fn approve(
        &self,
        id: RequestId,
        reviewer: OwnerId,
    ) -> Result<Provisioned, ApprovalError> {
        self.engine.approve(id, reviewer)
    }

    /// `pending → rejected`. No side effects beyond the status stamp.
    pub fn reject(&self, id: RequestId, reviewer: OwnerId) -> DomainResult<()> {
        let mut request = self.store.get_request(id)?.ok_or(DomainError::NotFound)?;
        request.reject(reviewer, Utc::now())?;
        self.store.transition_request(request)?;
        self.notifier
            .notify(Notification::RegistrationRejected { request_id: id });
        tracing::info!(request_id = %id, "registration request rejected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryStore;
    use crate::notify::TracingNotifier;
    use crate::store::RoleAccountStore;

    fn service() -> RegistrationService<InMemoryStore> {
        RegistrationService::new(Arc::new(InMemoryStore::new()), Arc::new(TracingNotifier))
    }

    fn application(email: &str) -> NewApplication {
        NewApplication {
            company: CompanyFacts {
                name: "Acme".into(),
                registration_number: "123".into(),
                industry: "Tech".into(),
                description: None,
                branches: vec![],
                tax_number: None,
                size: "50".into(),
                linkedin: None,
                logo_ref: None,
            },
            admin_email: email.into(),
            admin_password: "secret".into(),
            admin_first_name: Some("Ada".into()),
            admin_last_name: Some("Lovelace".into()),
            admin_phone: None,
        }
    }

    #[test]
    fn submit_hashes_the_password_before_storing() {
        let svc = service();
        let id = svc.submit(application("a@x.com")).unwrap();

        let stored = svc.get(id).unwrap();
        let digest = &stored.application.admin.password_hash;
        assert_ne!(digest, "secret");
        assert!(CredentialStore::new().verify("secret", digest));
    }

    #[test]
    fn submit_rejects_duplicate_admin_email() {
        let svc = service();
        svc.submit(application("a@x.com")).unwrap();

        let err = svc.submit(application("a@x.com")).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn submit_reports_missing_fields_without_hashing_detour() {
        let svc = service();
        let mut app = application("a@x.com");
        app.company.name = String::new();
        app.admin_password = String::new();

        let err = svc.submit(app).unwrap_err();
        match err {
            DomainError::Validation { fields } => {
                assert!(fields.contains(&"company_name".to_string()));
                assert!(fields.contains(&"admin_password".to_string()));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn reject_is_terminal_and_creates_nothing() {
        let svc = service();
        let id = svc.submit(application("a@x.com")).unwrap();
        let reviewer = OwnerId::new();

        svc.reject(id, reviewer).unwrap();
        let stored = svc.get(id).unwrap();
        assert_eq!(stored.status, RequestStatus::Rejected);
        assert_eq!(stored.reviewed_by, Some(reviewer));
        assert!(svc.store.find_admin_by_email("a@x.com").unwrap().is_none());

        // Both further transitions are refused.
        assert!(matches!(
            svc.reject(id, reviewer).unwrap_err(),
            DomainError::InvalidState(_)
        ));
        assert!(matches!(
            svc.approve(id, reviewer).unwrap_err(),
            ApprovalError::Domain(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn approve_then_reject_is_refused() {
        let svc = service();
        let id = svc.submit(application("a@x.com")).unwrap();
        svc.approve(id, OwnerId::new()).unwrap();

        let err = svc.reject(id, OwnerId::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }
}
