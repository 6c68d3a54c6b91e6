//! Provisioning engine: turns an approved application into the live
//! employee/company/admin triangle.
//!
//! The three rows reference each other in a cycle
//! (`Company.admin_id → Admin.employee_id → Employee.company_id →
//! Company.id`), so no insert order satisfies every reference up front.
//! The engine breaks the cycle deterministically:
//!
//! 1. pre-check: proposed-admin email must be free in the Admin table
//! 2. insert Employee with `company_id` unset
//! 3. insert Company referencing the request + a pre-allocated AdminId
//!    (the one-company-per-request constraint picks the winner under
//!    concurrent approval)
//! 4. insert Admin under the pre-allocated id, referencing the Employee
//! 5. attach the Employee to the Company
//! 6. conditionally mark the request approved (only-if-still-pending)
//!
//! Any failing step deletes everything this invocation created, in LIFO
//! order, before the error escapes. Readers never observe a partial
//! triangle, and the request stays pending.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use onboard_auth::accounts::AdminAccount;
use onboard_core::{
    AdminId, CompanyId, DomainError, EmployeeId, OwnerId, RequestId,
};
use onboard_directory::{Company, Employee, Position};
use onboard_registration::RegistrationRequest;

use crate::notify::{Notification, Notifier};
use crate::store::Store;

/// The three ids materialized by a successful approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Provisioned {
    pub employee_id: EmployeeId,
    pub company_id: CompanyId,
    pub admin_id: AdminId,
}

/// Which step of the transaction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    CreateEmployee,
    CreateCompany,
    CreateAdmin,
    AttachEmployee,
    ApproveRequest,
}

impl core::fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ProvisioningStep::CreateEmployee => "create-employee",
            ProvisioningStep::CreateCompany => "create-company",
            ProvisioningStep::CreateAdmin => "create-admin",
            ProvisioningStep::AttachEmployee => "attach-employee",
            ProvisioningStep::ApproveRequest => "approve-request",
        };
        f.write_str(name)
    }
}

/// Mid-transaction failure, surfaced only after compensation has run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("provisioning failed at {step}: {source}")]
pub struct ProvisioningError {
    pub step: ProvisioningStep,
    #[source]
    pub source: DomainError,
}

/// Approval outcome when it is not a success.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    /// Failed before any write: unknown request, non-pending request,
    /// duplicate admin email, store timeout.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Failed mid-transaction; all of this invocation's writes were undone.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

/// Undo log entry for one write of the current invocation.
enum Undo {
    Employee(EmployeeId),
    Company(CompanyId),
    Admin(AdminId),
}

pub struct ProvisioningEngine<S> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Store> ProvisioningEngine<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Approve a pending request and provision its triangle.
    ///
    /// Either fully succeeds (three new rows, request approved) or fully
    /// fails (request pending, zero new rows). The engine is synchronous,
    /// so an async caller giving up cannot skip the compensation path.
    pub fn approve(
        &self,
        request_id: RequestId,
        reviewer: OwnerId,
    ) -> Result<Provisioned, ApprovalError> {
        let request = self
            .store
            .get_request(request_id)?
            .ok_or(DomainError::NotFound)?;
        if !request.is_pending() {
            return Err(DomainError::invalid_state(format!(
                "cannot approve a request in status {}",
                request.status
            ))
            .into());
        }

        let admin_email = request.application.admin.login_email.clone();
        if self.store.find_admin_by_email(&admin_email)?.is_some() {
            return Err(DomainError::duplicate(format!(
                "admin email {admin_email} is already registered"
            ))
            .into());
        }

        // Pre-allocate the whole triangle so later-inserted rows can be
        // referenced by earlier-inserted ones.
        let employee_id = EmployeeId::new();
        let company_id = CompanyId::new();
        let admin_id = AdminId::new();
        let mut undo: Vec<Undo> = Vec::with_capacity(3);

        let outcome = self.run_steps(
            &request, reviewer, employee_id, company_id, admin_id, &mut undo,
        );

        match outcome {
            Ok(()) => {
                self.notifier.notify(Notification::CompanyProvisioned {
                    request_id,
                    company_id,
                    admin_id,
                });
                tracing::info!(
                    %request_id, %employee_id, %company_id, %admin_id,
                    "registration request provisioned"
                );
                Ok(Provisioned {
                    employee_id,
                    company_id,
                    admin_id,
                })
            }
            Err(err) => {
                self.compensate(undo);
                tracing::warn!(%request_id, step = %err.step, error = %err.source,
                    "provisioning failed; compensated");
                Err(err.into())
            }
        }
    }

    fn run_steps(
        &self,
        request: &RegistrationRequest,
        reviewer: OwnerId,
        employee_id: EmployeeId,
        company_id: CompanyId,
        admin_id: AdminId,
        undo: &mut Vec<Undo>,
    ) -> Result<(), ProvisioningError> {
        let now = Utc::now();
        let snapshot = &request.application;
        let step = |step: ProvisioningStep| move |source: DomainError| ProvisioningError { step, source };

        let employee = Employee::new(
            employee_id,
            snapshot.admin.first_name.as_deref().unwrap_or("Admin"),
            snapshot
                .admin
                .last_name
                .as_deref()
                .unwrap_or(&snapshot.company.name),
            &snapshot.admin.login_email,
            snapshot.admin.phone.clone(),
            Position::Administrator,
            now,
        )
        .map_err(step(ProvisioningStep::CreateEmployee))?;
        self.store
            .insert_employee(employee)
            .map_err(step(ProvisioningStep::CreateEmployee))?;
        undo.push(Undo::Employee(employee_id));

        let company = Company::new(
            company_id,
            snapshot.company.clone(),
            request.id,
            admin_id,
            now,
        )
        .map_err(step(ProvisioningStep::CreateCompany))?;
        self.store
            .insert_company(company)
            .map_err(step(ProvisioningStep::CreateCompany))?;
        undo.push(Undo::Company(company_id));

        let admin = AdminAccount::new(
            admin_id,
            employee_id,
            &snapshot.admin.login_email,
            snapshot.admin.password_hash.clone(),
            now,
        )
        .map_err(step(ProvisioningStep::CreateAdmin))?;
        self.store
            .insert_admin(admin)
            .map_err(step(ProvisioningStep::CreateAdmin))?;
        undo.push(Undo::Admin(admin_id));

        self.store
            .attach_employee(employee_id, company_id)
            .map_err(step(ProvisioningStep::AttachEmployee))?;

        let mut approved = request.clone();
        approved
            .approve(reviewer, now)
            .map_err(step(ProvisioningStep::ApproveRequest))?;
        self.store
            .transition_request(approved)
            .map_err(step(ProvisioningStep::ApproveRequest))?;

        Ok(())
    }

    /// Undo this invocation's writes, newest first. Best effort: a failing
    /// delete is logged and the rest still run.
    fn compensate(&self, undo: Vec<Undo>) {
        for op in undo.into_iter().rev() {
            let result = match &op {
                Undo::Admin(id) => self.store.delete_admin(*id),
                Undo::Company(id) => self.store.delete_company(*id),
                Undo::Employee(id) => self.store.delete_employee(*id),
            };
            if let Err(e) = result {
                let what = match op {
                    Undo::Admin(_) => "admin",
                    Undo::Company(_) => "company",
                    Undo::Employee(_) => "employee",
                };
                tracing::error!(entity = what, error = %e, "compensation delete failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryStore;
    use crate::notify::TracingNotifier;
    use crate::store::{
        CompanyStore, EmployeeStore, OrgUnitStore, RequestStore, RoleAccountStore, SessionStore,
    };
    use onboard_auth::accounts::{OwnerAccount, SupervisorAccount, TraineeAccount};
    use onboard_auth::Session;
    use onboard_core::{DepartmentId, DomainResult, SessionId, SupervisorId, TraineeId};
    use onboard_directory::{CompanyFacts, Department, Group};
    use onboard_registration::{AdminApplication, RequestStatus};
    use std::sync::Mutex;

    fn facts() -> CompanyFacts {
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

    fn pending_request(email: &str) -> RegistrationRequest {
        RegistrationRequest::submit(
            RequestId::new(),
            facts(),
            AdminApplication {
                login_email: email.into(),
                password_hash: "$argon2id$fake".into(),
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                phone: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: Notification) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn engine(store: Arc<InMemoryStore>) -> ProvisioningEngine<InMemoryStore> {
        ProvisioningEngine::new(store, Arc::new(TracingNotifier))
    }

    #[test]
    fn approval_closes_the_reference_triangle() {
        let store = Arc::new(InMemoryStore::new());
        let request = pending_request("a@x.com");
        let request_id = request.id;
        store.insert_request(request).unwrap();

        let ids = engine(store.clone())
            .approve(request_id, OwnerId::new())
            .unwrap();

        let company = store.get_company(ids.company_id).unwrap().unwrap();
        let admin = store.get_admin(ids.admin_id).unwrap().unwrap();
        let employee = store.get_employee(ids.employee_id).unwrap().unwrap();

        // Company → Admin → Employee → Company round-trips.
        assert_eq!(company.admin_id, admin.id);
        assert_eq!(admin.employee_id, employee.id);
        assert_eq!(employee.company_id, Some(company.id));
        assert_eq!(company.origin_request_id, request_id);

        let request = store.get_request(request_id).unwrap().unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert!(request.reviewed_by.is_some());
    }

    #[test]
    fn approving_unknown_request_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = engine(store).approve(RequestId::new(), OwnerId::new()).unwrap_err();
        assert!(matches!(err, ApprovalError::Domain(DomainError::NotFound)));
    }

    #[test]
    fn second_sequential_approval_is_invalid_state_with_no_duplicates() {
        let store = Arc::new(InMemoryStore::new());
        let request = pending_request("a@x.com");
        let request_id = request.id;
        store.insert_request(request).unwrap();

        let engine = engine(store.clone());
        let first = engine.approve(request_id, OwnerId::new()).unwrap();
        let err = engine.approve(request_id, OwnerId::new()).unwrap_err();
        assert!(matches!(
            err,
            ApprovalError::Domain(DomainError::InvalidState(_))
        ));

        // Still exactly one of each.
        assert!(store.get_company(first.company_id).unwrap().is_some());
        assert!(store.get_admin(first.admin_id).unwrap().is_some());
        assert!(store.get_employee(first.employee_id).unwrap().is_some());
    }

    #[test]
    fn duplicate_admin_email_fails_before_any_write() {
        let store = Arc::new(InMemoryStore::new());

        let first = pending_request("a@x.com");
        let first_id = first.id;
        store.insert_request(first).unwrap();
        let engine = engine(store.clone());
        engine.approve(first_id, OwnerId::new()).unwrap();

        // A second pending request for the same admin email (inserted
        // behind the store's back to bypass the request-level uniqueness).
        let mut second = pending_request("b@x.com");
        second.application.admin.login_email = "a@x.com".into();
        let second_id = second.id;
        store.insert_request(second).unwrap();

        let err = engine.approve(second_id, OwnerId::new()).unwrap_err();
        assert!(matches!(
            err,
            ApprovalError::Domain(DomainError::Duplicate(_))
        ));
        assert_eq!(
            store.get_request(second_id).unwrap().unwrap().status,
            RequestStatus::Pending
        );
    }

    /// Store wrapper that fails a chosen operation, for compensation tests.
    struct SabotagedStore {
        inner: InMemoryStore,
        fail_admin_insert: bool,
        fail_transition: bool,
    }

    impl SabotagedStore {
        fn failing_admin_insert() -> Self {
            Self {
                inner: InMemoryStore::new(),
                fail_admin_insert: true,
                fail_transition: false,
            }
        }

        fn failing_transition() -> Self {
            Self {
                inner: InMemoryStore::new(),
                fail_admin_insert: false,
                fail_transition: true,
            }
        }
    }

    impl RequestStore for SabotagedStore {
        fn insert_request(&self, request: RegistrationRequest) -> DomainResult<()> {
            self.inner.insert_request(request)
        }
        fn get_request(&self, id: RequestId) -> DomainResult<Option<RegistrationRequest>> {
            self.inner.get_request(id)
        }
        fn list_requests(
            &self,
            status: Option<RequestStatus>,
        ) -> DomainResult<Vec<RegistrationRequest>> {
            self.inner.list_requests(status)
        }
        fn transition_request(&self, updated: RegistrationRequest) -> DomainResult<()> {
            if self.fail_transition {
                return Err(DomainError::Timeout);
            }
            self.inner.transition_request(updated)
        }
    }

    impl EmployeeStore for SabotagedStore {
        fn insert_employee(&self, employee: Employee) -> DomainResult<()> {
            self.inner.insert_employee(employee)
        }
        fn get_employee(&self, id: EmployeeId) -> DomainResult<Option<Employee>> {
            self.inner.get_employee(id)
        }
        fn attach_employee(&self, id: EmployeeId, company_id: CompanyId) -> DomainResult<()> {
            self.inner.attach_employee(id, company_id)
        }
        fn delete_employee(&self, id: EmployeeId) -> DomainResult<()> {
            self.inner.delete_employee(id)
        }
    }

    impl CompanyStore for SabotagedStore {
        fn insert_company(&self, company: Company) -> DomainResult<()> {
            self.inner.insert_company(company)
        }
        fn get_company(&self, id: CompanyId) -> DomainResult<Option<Company>> {
            self.inner.get_company(id)
        }
        fn delete_company(&self, id: CompanyId) -> DomainResult<()> {
            self.inner.delete_company(id)
        }
    }

    impl RoleAccountStore for SabotagedStore {
        fn insert_admin(&self, account: AdminAccount) -> DomainResult<()> {
            if self.fail_admin_insert {
                return Err(DomainError::Timeout);
            }
            self.inner.insert_admin(account)
        }
        fn get_admin(&self, id: AdminId) -> DomainResult<Option<AdminAccount>> {
            self.inner.get_admin(id)
        }
        fn find_admin_by_email(&self, email: &str) -> DomainResult<Option<AdminAccount>> {
            self.inner.find_admin_by_email(email)
        }
        fn delete_admin(&self, id: AdminId) -> DomainResult<()> {
            self.inner.delete_admin(id)
        }
        fn insert_supervisor(&self, account: SupervisorAccount) -> DomainResult<()> {
            self.inner.insert_supervisor(account)
        }
        fn get_supervisor(&self, id: SupervisorId) -> DomainResult<Option<SupervisorAccount>> {
            self.inner.get_supervisor(id)
        }
        fn find_supervisor_by_email(&self, email: &str) -> DomainResult<Option<SupervisorAccount>> {
            self.inner.find_supervisor_by_email(email)
        }
        fn insert_trainee(&self, account: TraineeAccount) -> DomainResult<()> {
            self.inner.insert_trainee(account)
        }
        fn get_trainee(&self, id: TraineeId) -> DomainResult<Option<TraineeAccount>> {
            self.inner.get_trainee(id)
        }
        fn find_trainee_by_email(&self, email: &str) -> DomainResult<Option<TraineeAccount>> {
            self.inner.find_trainee_by_email(email)
        }
        fn insert_owner(&self, account: OwnerAccount) -> DomainResult<()> {
            self.inner.insert_owner(account)
        }
        fn get_owner(&self, id: OwnerId) -> DomainResult<Option<OwnerAccount>> {
            self.inner.get_owner(id)
        }
        fn find_owner_by_email(&self, email: &str) -> DomainResult<Option<OwnerAccount>> {
            self.inner.find_owner_by_email(email)
        }
    }

    impl SessionStore for SabotagedStore {
        fn insert_session(&self, session: Session) -> DomainResult<()> {
            self.inner.insert_session(session)
        }
        fn get_session(&self, id: SessionId) -> DomainResult<Option<Session>> {
            self.inner.get_session(id)
        }
        fn update_session(&self, session: Session) -> DomainResult<()> {
            self.inner.update_session(session)
        }
    }

    impl OrgUnitStore for SabotagedStore {
        fn insert_department(&self, department: Department) -> DomainResult<()> {
            self.inner.insert_department(department)
        }
        fn list_departments(&self, company_id: CompanyId) -> DomainResult<Vec<Department>> {
            self.inner.list_departments(company_id)
        }
        fn insert_group(&self, group: Group) -> DomainResult<()> {
            self.inner.insert_group(group)
        }
        fn list_groups(&self, department_id: DepartmentId) -> DomainResult<Vec<Group>> {
            self.inner.list_groups(department_id)
        }
    }

    #[test]
    fn failure_mid_transaction_compensates_and_leaves_request_pending() {
        let store = Arc::new(SabotagedStore::failing_admin_insert());
        let request = pending_request("a@x.com");
        let request_id = request.id;
        store.insert_request(request).unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let engine = ProvisioningEngine::new(store.clone(), notifier.clone());

        let err = engine.approve(request_id, OwnerId::new()).unwrap_err();
        let ApprovalError::Provisioning(p) = err else {
            panic!("expected a provisioning error");
        };
        assert_eq!(p.step, ProvisioningStep::CreateAdmin);

        // Nothing half-created is visible, the request is still reviewable.
        let stored = store.get_request(request_id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);
        assert!(store
            .inner
            .find_admin_by_email("a@x.com")
            .unwrap()
            .is_none());
        assert!(notifier.events.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_conditional_approval_rolls_back_the_triangle() {
        let store = Arc::new(SabotagedStore::failing_transition());
        let request = pending_request("a@x.com");
        let request_id = request.id;
        store.insert_request(request).unwrap();

        let engine = ProvisioningEngine::new(store.clone(), Arc::new(TracingNotifier));
        let err = engine.approve(request_id, OwnerId::new()).unwrap_err();
        let ApprovalError::Provisioning(p) = err else {
            panic!("expected a provisioning error");
        };
        assert_eq!(p.step, ProvisioningStep::ApproveRequest);

        // All three rows were deleted again.
        assert!(store.inner.find_admin_by_email("a@x.com").unwrap().is_none());
        let stored = store.get_request(request_id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);
    }

    #[test]
    fn concurrent_approvals_provision_exactly_once() {
        let store = Arc::new(InMemoryStore::new());
        let request = pending_request("a@x.com");
        let request_id = request.id;
        store.insert_request(request).unwrap();

        let engine = Arc::new(ProvisioningEngine::new(
            store.clone(),
            Arc::new(TracingNotifier) as Arc<dyn Notifier>,
        ));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = engine.clone();
            handles.push(std::thread::spawn(move || {
                engine.approve(request_id, OwnerId::new())
            }));
        }

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes: Vec<_> = outcomes.iter().filter(|o| o.is_ok()).collect();
        assert_eq!(successes.len(), 1, "exactly one approval must win");

        // Entity counts attributable to the request never exceed one each.
        let ids = successes[0].as_ref().unwrap();
        let company = store.get_company(ids.company_id).unwrap().unwrap();
        assert_eq!(company.origin_request_id, request_id);
        assert!(store.get_admin(ids.admin_id).unwrap().is_some());
        assert!(store.get_employee(ids.employee_id).unwrap().is_some());
        // The losers compensated: their admin email slot is the winner's.
        assert_eq!(
            store.find_admin_by_email("a@x.com").unwrap().unwrap().id,
            ids.admin_id
        );
    }
}
