//! In-memory store for tests/dev: one `RwLock` over the whole state.
//!
//! Each trait method takes the lock once, so every store operation is
//! atomic. Lock acquisition is bounded: a wait past the configured deadline
//! surfaces [`DomainError::Timeout`] rather than hanging the caller.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};
use std::time::{Duration, Instant};

use onboard_auth::accounts::{AdminAccount, OwnerAccount, SupervisorAccount, TraineeAccount};
use onboard_auth::Session;
use onboard_core::{
    AdminId, CompanyId, DepartmentId, DomainError, DomainResult, EmployeeId, GroupId, OwnerId,
    RequestId, SessionId, SupervisorId, TraineeId,
};
use onboard_directory::{Company, Department, Employee, Group};
use onboard_registration::{RegistrationRequest, RequestStatus};

use crate::store::{
    CompanyStore, EmployeeStore, OrgUnitStore, RequestStore, RoleAccountStore, SessionStore,
};

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct State {
    requests: HashMap<RequestId, RegistrationRequest>,
    employees: HashMap<EmployeeId, Employee>,
    companies: HashMap<CompanyId, Company>,
    admins: HashMap<AdminId, AdminAccount>,
    supervisors: HashMap<SupervisorId, SupervisorAccount>,
    trainees: HashMap<TraineeId, TraineeAccount>,
    owners: HashMap<OwnerId, OwnerAccount>,
    sessions: HashMap<SessionId, Session>,
    departments: HashMap<DepartmentId, Department>,
    groups: HashMap<GroupId, Group>,
}

impl State {
    /// Whether an employee already backs a role-table account.
    fn employee_is_promoted(&self, id: EmployeeId) -> bool {
        self.admins.values().any(|a| a.employee_id == id)
            || self.supervisors.values().any(|s| s.employee_id == id)
            || self.trainees.values().any(|t| t.employee_id == id)
    }
}

/// The single logical data store, in memory.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<State>,
    lock_timeout: Duration,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            state: RwLock::new(State::default()),
            lock_timeout,
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, State>> {
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match self.state.try_read() {
                Ok(guard) => return Ok(guard),
                // A poisoned lock means a writer panicked mid-operation;
                // nothing to salvage for this request.
                Err(TryLockError::Poisoned(_)) => return Err(DomainError::Timeout),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(DomainError::Timeout);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, State>> {
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match self.state.try_write() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(_)) => return Err(DomainError::Timeout),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(DomainError::Timeout);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore for InMemoryStore {
    fn insert_request(&self, request: RegistrationRequest) -> DomainResult<()> {
        let mut state = self.write()?;
        let email = &request.application.admin.login_email;
        if state
            .requests
            .values()
            .any(|r| &r.application.admin.login_email == email)
        {
            return Err(DomainError::duplicate(format!(
                "a registration request for {email} already exists"
            )));
        }
        state.requests.insert(request.id, request);
        Ok(())
    }

    fn get_request(&self, id: RequestId) -> DomainResult<Option<RegistrationRequest>> {
        Ok(self.read()?.requests.get(&id).cloned())
    }

    fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> DomainResult<Vec<RegistrationRequest>> {
        let state = self.read()?;
        let mut items: Vec<_> = state
            .requests
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        // Review screens read terminal requests by review recency, pending
        // ones by submission recency.
        match status {
            Some(RequestStatus::Approved) | Some(RequestStatus::Rejected) => {
                items.sort_by(|a, b| b.reviewed_at.cmp(&a.reviewed_at));
            }
            _ => items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at)),
        }
        Ok(items)
    }

    fn transition_request(&self, updated: RegistrationRequest) -> DomainResult<()> {
        let mut state = self.write()?;
        let stored = state
            .requests
            .get_mut(&updated.id)
            .ok_or(DomainError::NotFound)?;
        if !stored.is_pending() {
            return Err(DomainError::invalid_state(format!(
                "request is already {}",
                stored.status
            )));
        }
        *stored = updated;
        Ok(())
    }
}

impl EmployeeStore for InMemoryStore {
    fn insert_employee(&self, employee: Employee) -> DomainResult<()> {
        let mut state = self.write()?;
        if state.employees.values().any(|e| e.email == employee.email) {
            return Err(DomainError::duplicate(format!(
                "employee email {} already exists",
                employee.email
            )));
        }
        if let Some(code) = &employee.employee_code {
            if state
                .employees
                .values()
                .any(|e| e.employee_code.as_deref() == Some(code))
            {
                return Err(DomainError::duplicate(format!(
                    "employee code {code} already exists"
                )));
            }
        }
        state.employees.insert(employee.id, employee);
        Ok(())
    }

    fn get_employee(&self, id: EmployeeId) -> DomainResult<Option<Employee>> {
        Ok(self.read()?.employees.get(&id).cloned())
    }

    fn attach_employee(&self, id: EmployeeId, company_id: CompanyId) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.companies.contains_key(&company_id) {
            return Err(DomainError::conflict("company does not exist"));
        }
        let employee = state.employees.get_mut(&id).ok_or(DomainError::NotFound)?;
        if employee.company_id.is_some() {
            return Err(DomainError::conflict("employee already attached to a company"));
        }
        employee.company_id = Some(company_id);
        Ok(())
    }

    fn delete_employee(&self, id: EmployeeId) -> DomainResult<()> {
        self.write()?.employees.remove(&id);
        Ok(())
    }
}

impl CompanyStore for InMemoryStore {
    fn insert_company(&self, company: Company) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.requests.contains_key(&company.origin_request_id) {
            return Err(DomainError::conflict("origin registration request does not exist"));
        }
        if state
            .companies
            .values()
            .any(|c| c.origin_request_id == company.origin_request_id)
        {
            return Err(DomainError::duplicate(
                "a company was already provisioned for this request",
            ));
        }
        // company.admin_id is a pre-allocated id; the admin row lands right
        // after this insert and the provisioning engine owns the ordering.
        state.companies.insert(company.id, company);
        Ok(())
    }

    fn get_company(&self, id: CompanyId) -> DomainResult<Option<Company>> {
        Ok(self.read()?.companies.get(&id).cloned())
    }

    fn delete_company(&self, id: CompanyId) -> DomainResult<()> {
        self.write()?.companies.remove(&id);
        Ok(())
    }
}

impl RoleAccountStore for InMemoryStore {
    fn insert_admin(&self, account: AdminAccount) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.employees.contains_key(&account.employee_id) {
            return Err(DomainError::conflict("employee does not exist"));
        }
        if state.employee_is_promoted(account.employee_id) {
            return Err(DomainError::duplicate("employee already holds a role"));
        }
        if state
            .admins
            .values()
            .any(|a| a.login_email == account.login_email)
        {
            return Err(DomainError::duplicate(format!(
                "admin email {} already exists",
                account.login_email
            )));
        }
        state.admins.insert(account.id, account);
        Ok(())
    }

    fn get_admin(&self, id: AdminId) -> DomainResult<Option<AdminAccount>> {
        Ok(self.read()?.admins.get(&id).cloned())
    }

    fn find_admin_by_email(&self, email: &str) -> DomainResult<Option<AdminAccount>> {
        let email = email.to_lowercase();
        Ok(self
            .read()?
            .admins
            .values()
            .find(|a| a.login_email == email)
            .cloned())
    }

    fn delete_admin(&self, id: AdminId) -> DomainResult<()> {
        self.write()?.admins.remove(&id);
        Ok(())
    }

    fn insert_supervisor(&self, account: SupervisorAccount) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.employees.contains_key(&account.employee_id) {
            return Err(DomainError::conflict("employee does not exist"));
        }
        if state.employee_is_promoted(account.employee_id) {
            return Err(DomainError::duplicate("employee already holds a role"));
        }
        if state
            .supervisors
            .values()
            .any(|s| s.login_email == account.login_email)
        {
            return Err(DomainError::duplicate(format!(
                "supervisor email {} already exists",
                account.login_email
            )));
        }
        state.supervisors.insert(account.id, account);
        Ok(())
    }

    fn get_supervisor(&self, id: SupervisorId) -> DomainResult<Option<SupervisorAccount>> {
        Ok(self.read()?.supervisors.get(&id).cloned())
    }

    fn find_supervisor_by_email(&self, email: &str) -> DomainResult<Option<SupervisorAccount>> {
        let email = email.to_lowercase();
        Ok(self
            .read()?
            .supervisors
            .values()
            .find(|s| s.login_email == email)
            .cloned())
    }

    fn insert_trainee(&self, account: TraineeAccount) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.employees.contains_key(&account.employee_id) {
            return Err(DomainError::conflict("employee does not exist"));
        }
        if state.employee_is_promoted(account.employee_id) {
            return Err(DomainError::duplicate("employee already holds a role"));
        }
        if state
            .trainees
            .values()
            .any(|t| t.login_email == account.login_email)
        {
            return Err(DomainError::duplicate(format!(
                "trainee email {} already exists",
                account.login_email
            )));
        }
        state.trainees.insert(account.id, account);
        Ok(())
    }

    fn get_trainee(&self, id: TraineeId) -> DomainResult<Option<TraineeAccount>> {
        Ok(self.read()?.trainees.get(&id).cloned())
    }

    fn find_trainee_by_email(&self, email: &str) -> DomainResult<Option<TraineeAccount>> {
        let email = email.to_lowercase();
        Ok(self
            .read()?
            .trainees
            .values()
            .find(|t| t.login_email == email)
            .cloned())
    }

    fn insert_owner(&self, account: OwnerAccount) -> DomainResult<()> {
        let mut state = self.write()?;
        if state
            .owners
            .values()
            .any(|o| o.login_email == account.login_email)
        {
            return Err(DomainError::duplicate(format!(
                "owner email {} already exists",
                account.login_email
            )));
        }
        state.owners.insert(account.id, account);
        Ok(())
    }

    fn get_owner(&self, id: OwnerId) -> DomainResult<Option<OwnerAccount>> {
        Ok(self.read()?.owners.get(&id).cloned())
    }

    fn find_owner_by_email(&self, email: &str) -> DomainResult<Option<OwnerAccount>> {
        let email = email.to_lowercase();
        Ok(self
            .read()?
            .owners
            .values()
            .find(|o| o.login_email == email)
            .cloned())
    }
}

impl SessionStore for InMemoryStore {
    fn insert_session(&self, session: Session) -> DomainResult<()> {
        self.write()?.sessions.insert(session.id, session);
        Ok(())
    }

    fn get_session(&self, id: SessionId) -> DomainResult<Option<Session>> {
        Ok(self.read()?.sessions.get(&id).cloned())
    }

    fn update_session(&self, session: Session) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.sessions.contains_key(&session.id) {
            return Err(DomainError::NotFound);
        }
        state.sessions.insert(session.id, session);
        Ok(())
    }
}

impl OrgUnitStore for InMemoryStore {
    fn insert_department(&self, department: Department) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.companies.contains_key(&department.company_id) {
            return Err(DomainError::conflict("company does not exist"));
        }
        if state
            .departments
            .values()
            .any(|d| d.company_id == department.company_id && d.name == department.name)
        {
            return Err(DomainError::duplicate(format!(
                "department {} already exists in this company",
                department.name
            )));
        }
        state.departments.insert(department.id, department);
        Ok(())
    }

    fn list_departments(&self, company_id: CompanyId) -> DomainResult<Vec<Department>> {
        let state = self.read()?;
        let mut items: Vec<_> = state
            .departments
            .values()
            .filter(|d| d.company_id == company_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn insert_group(&self, group: Group) -> DomainResult<()> {
        let mut state = self.write()?;
        if !state.departments.contains_key(&group.department_id) {
            return Err(DomainError::conflict("department does not exist"));
        }
        state.groups.insert(group.id, group);
        Ok(())
    }

    fn list_groups(&self, department_id: DepartmentId) -> DomainResult<Vec<Group>> {
        let state = self.read()?;
        let mut items: Vec<_> = state
            .groups
            .values()
            .filter(|g| g.department_id == department_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use onboard_directory::{CompanyFacts, Position};
    use onboard_registration::AdminApplication;

    fn facts(name: &str) -> CompanyFacts {
        CompanyFacts {
            name: name.into(),
            registration_number: "123".into(),
            industry: "Tech".into(),
            description: None,
            branches: vec![],
            tax_number: None,
            size: "50".into(),
            linkedin: None,
            logo_ref: None,
        }
    }

    fn request(email: &str) -> RegistrationRequest {
        RegistrationRequest::submit(
            RequestId::new(),
            facts("Acme"),
            AdminApplication {
                login_email: email.into(),
                password_hash: "$argon2id$fake".into(),
                first_name: None,
                last_name: None,
                phone: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn employee(email: &str) -> Employee {
        Employee::new(
            EmployeeId::new(),
            "Ada",
            "Lovelace",
            email,
            None,
            Position::Administrator,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn bounded_lock_wait_surfaces_timeout() {
        let store = InMemoryStore::with_lock_timeout(Duration::from_millis(10));
        // Hold the write lock so every bounded acquisition runs out of time.
        let _guard = store.state.write().unwrap();
        assert!(matches!(
            store.get_request(RequestId::new()).unwrap_err(),
            DomainError::Timeout
        ));
        assert!(matches!(
            store.insert_employee(employee("t@x.com")).unwrap_err(),
            DomainError::Timeout
        ));
    }

    #[test]
    fn duplicate_proposed_admin_email_is_rejected_across_statuses() {
        let store = InMemoryStore::new();
        let mut first = request("a@x.com");
        first.approve(OwnerId::new(), Utc::now()).unwrap();
        // Even a reviewed request blocks resubmission of the same email.
        store.insert_request(first).unwrap();

        let err = store.insert_request(request("a@x.com")).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn transition_is_conditional_on_pending() {
        let store = InMemoryStore::new();
        let stored = request("a@x.com");
        let id = stored.id;
        store.insert_request(stored.clone()).unwrap();

        // First reviewer wins.
        let mut winner = stored.clone();
        winner.approve(OwnerId::new(), Utc::now()).unwrap();
        store.transition_request(winner).unwrap();

        // A stale copy of the same pending request loses.
        let mut loser = stored;
        loser.reject(OwnerId::new(), Utc::now()).unwrap();
        let err = store.transition_request(loser).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        assert_eq!(
            store.get_request(id).unwrap().unwrap().status,
            RequestStatus::Approved
        );
    }

    #[test]
    fn list_requests_sorts_pending_by_submission_recency() {
        let store = InMemoryStore::new();
        let mut older = request("a@x.com");
        older.submitted_at = Utc::now() - ChronoDuration::hours(1);
        let newer = request("b@x.com");
        store.insert_request(older.clone()).unwrap();
        store.insert_request(newer.clone()).unwrap();

        let listed = store.list_requests(Some(RequestStatus::Pending)).unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[test]
    fn one_company_per_request() {
        let store = InMemoryStore::new();
        let req = request("a@x.com");
        let req_id = req.id;
        store.insert_request(req).unwrap();

        let first = Company::new(
            CompanyId::new(),
            facts("Acme"),
            req_id,
            AdminId::new(),
            Utc::now(),
        )
        .unwrap();
        store.insert_company(first).unwrap();

        let second = Company::new(
            CompanyId::new(),
            facts("Acme"),
            req_id,
            AdminId::new(),
            Utc::now(),
        )
        .unwrap();
        let err = store.insert_company(second).unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn employee_cannot_hold_two_roles() {
        let store = InMemoryStore::new();
        let emp = employee("ada@x.com");
        let emp_id = emp.id;
        store.insert_employee(emp).unwrap();

        store
            .insert_admin(
                AdminAccount::new(AdminId::new(), emp_id, "ada@x.com", "h".into(), Utc::now())
                    .unwrap(),
            )
            .unwrap();

        let err = store
            .insert_supervisor(
                SupervisorAccount::new(
                    SupervisorId::new(),
                    emp_id,
                    "ada2@x.com",
                    "h".into(),
                    Utc::now(),
                )
                .unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn admin_requires_existing_employee() {
        let store = InMemoryStore::new();
        let err = store
            .insert_admin(
                AdminAccount::new(
                    AdminId::new(),
                    EmployeeId::new(),
                    "a@x.com",
                    "h".into(),
                    Utc::now(),
                )
                .unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn department_names_are_unique_per_company_and_groups_need_a_department() {
        let store = InMemoryStore::new();
        let req = request("a@x.com");
        let req_id = req.id;
        store.insert_request(req).unwrap();
        let company =
            Company::new(CompanyId::new(), facts("Acme"), req_id, AdminId::new(), Utc::now())
                .unwrap();
        let company_id = company.id;
        let admin_id = company.admin_id;
        store.insert_company(company).unwrap();

        let dept = Department::new(
            DepartmentId::new(),
            "Engineering",
            company_id,
            admin_id,
            Utc::now(),
        )
        .unwrap();
        let dept_id = dept.id;
        store.insert_department(dept).unwrap();

        let twin = Department::new(
            DepartmentId::new(),
            "Engineering",
            company_id,
            admin_id,
            Utc::now(),
        )
        .unwrap();
        assert!(matches!(
            store.insert_department(twin).unwrap_err(),
            DomainError::Duplicate(_)
        ));

        let orphan = Group::new(
            GroupId::new(),
            "Interns",
            DepartmentId::new(),
            admin_id,
            SupervisorId::new(),
            Utc::now(),
        )
        .unwrap();
        assert!(matches!(
            store.insert_group(orphan).unwrap_err(),
            DomainError::Conflict(_)
        ));

        let group = Group::new(
            GroupId::new(),
            "Interns",
            dept_id,
            admin_id,
            SupervisorId::new(),
            Utc::now(),
        )
        .unwrap();
        store.insert_group(group).unwrap();

        assert_eq!(store.list_departments(company_id).unwrap().len(), 1);
        assert_eq!(store.list_groups(dept_id).unwrap().len(), 1);
    }

    #[test]
    fn attach_employee_requires_company_and_is_one_shot() {
        let store = InMemoryStore::new();
        let emp = employee("ada@x.com");
        let emp_id = emp.id;
        store.insert_employee(emp).unwrap();

        let err = store.attach_employee(emp_id, CompanyId::new()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let req = request("a@x.com");
        let req_id = req.id;
        store.insert_request(req).unwrap();
        let company =
            Company::new(CompanyId::new(), facts("Acme"), req_id, AdminId::new(), Utc::now())
                .unwrap();
        let company_id = company.id;
        store.insert_company(company).unwrap();

        store.attach_employee(emp_id, company_id).unwrap();
        let err = store.attach_employee(emp_id, company_id).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
