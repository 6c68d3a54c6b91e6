//! Store traits: the single logical data store, split by entity family.
//!
//! Every method is synchronous and atomic with respect to the store
//! (per-operation atomicity is the only concurrency primitive the services
//! assume). Implementations must bound every internal wait and surface
//! [`DomainError::Timeout`] instead of blocking indefinitely.

use onboard_auth::accounts::{AdminAccount, OwnerAccount, SupervisorAccount, TraineeAccount};
use onboard_auth::Session;
use onboard_core::{
    AdminId, CompanyId, DepartmentId, DomainResult, EmployeeId, OwnerId, RequestId, SessionId,
    SupervisorId, TraineeId,
};
use onboard_directory::{Company, Department, Employee, Group};
use onboard_registration::{RegistrationRequest, RequestStatus};

/// Registration requests.
pub trait RequestStore: Send + Sync {
    /// Insert a new request. Rejects a second request carrying the same
    /// proposed-admin email, whatever its status.
    fn insert_request(&self, request: RegistrationRequest) -> DomainResult<()>;

    fn get_request(&self, id: RequestId) -> DomainResult<Option<RegistrationRequest>>;

    /// List requests, optionally filtered by status. Pending requests come
    /// newest-submitted-first; reviewed ones newest-reviewed-first.
    fn list_requests(&self, status: Option<RequestStatus>)
        -> DomainResult<Vec<RegistrationRequest>>;

    /// Conditional update: replace the stored request with `updated` only
    /// if the stored copy is still pending. A concurrent reviewer who got
    /// there first makes this fail with `InvalidState`, not overwrite.
    fn transition_request(&self, updated: RegistrationRequest) -> DomainResult<()>;
}

/// Employees.
pub trait EmployeeStore: Send + Sync {
    /// Insert a new employee. Email is globally unique; the org-assigned
    /// employee code is unique when present.
    fn insert_employee(&self, employee: Employee) -> DomainResult<()>;

    fn get_employee(&self, id: EmployeeId) -> DomainResult<Option<Employee>>;

    /// Populate `company_id` once provisioning has created the company.
    /// Fails on an already-attached employee.
    fn attach_employee(&self, id: EmployeeId, company_id: CompanyId) -> DomainResult<()>;

    /// Compensation path only.
    fn delete_employee(&self, id: EmployeeId) -> DomainResult<()>;
}

/// Companies.
pub trait CompanyStore: Send + Sync {
    /// Insert a new company. At most one company may ever reference a given
    /// registration request; the second insert for the same request fails
    /// with `Duplicate`. This is the winner-picking constraint under
    /// concurrent approval.
    fn insert_company(&self, company: Company) -> DomainResult<()>;

    fn get_company(&self, id: CompanyId) -> DomainResult<Option<Company>>;

    /// Compensation path only.
    fn delete_company(&self, id: CompanyId) -> DomainResult<()>;
}

/// The four role tables.
///
/// Login email is unique within each table. An employee backs at most one
/// account across the three employee-backed tables.
pub trait RoleAccountStore: Send + Sync {
    fn insert_admin(&self, account: AdminAccount) -> DomainResult<()>;
    fn get_admin(&self, id: AdminId) -> DomainResult<Option<AdminAccount>>;
    fn find_admin_by_email(&self, email: &str) -> DomainResult<Option<AdminAccount>>;
    /// Compensation path only.
    fn delete_admin(&self, id: AdminId) -> DomainResult<()>;

    fn insert_supervisor(&self, account: SupervisorAccount) -> DomainResult<()>;
    fn get_supervisor(&self, id: SupervisorId) -> DomainResult<Option<SupervisorAccount>>;
    fn find_supervisor_by_email(&self, email: &str) -> DomainResult<Option<SupervisorAccount>>;

    fn insert_trainee(&self, account: TraineeAccount) -> DomainResult<()>;
    fn get_trainee(&self, id: TraineeId) -> DomainResult<Option<TraineeAccount>>;
    fn find_trainee_by_email(&self, email: &str) -> DomainResult<Option<TraineeAccount>>;

    fn insert_owner(&self, account: OwnerAccount) -> DomainResult<()>;
    fn get_owner(&self, id: OwnerId) -> DomainResult<Option<OwnerAccount>>;
    fn find_owner_by_email(&self, email: &str) -> DomainResult<Option<OwnerAccount>>;
}

/// Sessions. Never deleted; logout is an update.
pub trait SessionStore: Send + Sync {
    fn insert_session(&self, session: Session) -> DomainResult<()>;
    fn get_session(&self, id: SessionId) -> DomainResult<Option<Session>>;
    fn update_session(&self, session: Session) -> DomainResult<()>;
}

/// Departments and groups: ordinary foreign-keyed children.
pub trait OrgUnitStore: Send + Sync {
    fn insert_department(&self, department: Department) -> DomainResult<()>;
    fn list_departments(&self, company_id: CompanyId) -> DomainResult<Vec<Department>>;

    fn insert_group(&self, group: Group) -> DomainResult<()>;
    fn list_groups(&self, department_id: DepartmentId) -> DomainResult<Vec<Group>>;
}

/// The whole store, as the services consume it.
pub trait Store:
    RequestStore + EmployeeStore + CompanyStore + RoleAccountStore + SessionStore + OrgUnitStore
{
}

impl<T> Store for T where
    T: RequestStore + EmployeeStore + CompanyStore + RoleAccountStore + SessionStore + OrgUnitStore
{
}
