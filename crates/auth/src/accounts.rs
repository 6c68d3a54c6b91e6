//! Role-table account records.
//!
//! Four independent credential tables: Admin, Supervisor and Trainee
//! accounts are promotions of an employee (the employee reference is
//! unique; no employee holds two roles), while the Owner is the platform
//! operator and stands alone. Each table enforces login-email uniqueness
//! at the store level; the records here only validate their own shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_core::{
    AdminId, DomainError, DomainResult, EmployeeId, Entity, OwnerId, SupervisorId, TraineeId,
};

/// Lowercase/trim an email and check the `local@domain.tld` shape.
pub fn normalize_login_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    let plausible = {
        let mut parts = email.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => {
                !local.is_empty() && domain.contains('.') && !domain.ends_with('.')
            }
            _ => false,
        }
    };
    if plausible {
        Ok(email)
    } else {
        Err(DomainError::validation(["login_email"]))
    }
}

/// Administrator account: owns exactly one company after provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: AdminId,
    pub employee_id: EmployeeId,
    pub login_email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub fn new(
        id: AdminId,
        employee_id: EmployeeId,
        login_email: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if password_hash.is_empty() {
            return Err(DomainError::validation(["password_hash"]));
        }
        Ok(Self {
            id,
            employee_id,
            login_email: normalize_login_email(login_email)?,
            password_hash,
            created_at: now,
        })
    }
}

impl Entity for AdminAccount {
    type Id = AdminId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Supervisor account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorAccount {
    pub id: SupervisorId,
    pub employee_id: EmployeeId,
    pub login_email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl SupervisorAccount {
    pub fn new(
        id: SupervisorId,
        employee_id: EmployeeId,
        login_email: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if password_hash.is_empty() {
            return Err(DomainError::validation(["password_hash"]));
        }
        Ok(Self {
            id,
            employee_id,
            login_email: normalize_login_email(login_email)?,
            password_hash,
            created_at: now,
        })
    }
}

impl Entity for SupervisorAccount {
    type Id = SupervisorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Trainee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraineeAccount {
    pub id: TraineeId,
    pub employee_id: EmployeeId,
    pub login_email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl TraineeAccount {
    pub fn new(
        id: TraineeId,
        employee_id: EmployeeId,
        login_email: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if password_hash.is_empty() {
            return Err(DomainError::validation(["password_hash"]));
        }
        Ok(Self {
            id,
            employee_id,
            login_email: normalize_login_email(login_email)?,
            password_hash,
            created_at: now,
        })
    }
}

impl Entity for TraineeAccount {
    type Id = TraineeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Platform operator account. Not backed by an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAccount {
    pub id: OwnerId,
    pub first_name: String,
    pub last_name: String,
    pub login_email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl OwnerAccount {
    pub fn new(
        id: OwnerId,
        first_name: &str,
        last_name: &str,
        login_email: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut missing = Vec::new();
        if first_name.trim().is_empty() {
            missing.push("first_name");
        }
        if last_name.trim().is_empty() {
            missing.push("last_name");
        }
        if password_hash.is_empty() {
            missing.push("password_hash");
        }
        if !missing.is_empty() {
            return Err(DomainError::validation(missing));
        }
        Ok(Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            login_email: normalize_login_email(login_email)?,
            password_hash,
            created_at: now,
        })
    }
}

impl Entity for OwnerAccount {
    type Id = OwnerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
