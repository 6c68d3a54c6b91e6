//! Employee entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_core::{CompanyId, DomainError, DomainResult, EmployeeId, Entity};

/// Fixed role enumeration for an employee's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Administrator,
    Supervisor,
    Trainee,
    Staff,
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Position::Administrator => write!(f, "administrator"),
            Position::Supervisor => write!(f, "supervisor"),
            Position::Trainee => write!(f, "trainee"),
            Position::Staff => write!(f, "staff"),
        }
    }
}

/// An employee of an onboarded (or being-onboarded) company.
///
/// # Invariants
/// - `email` is globally unique (store-enforced) and normalized lowercase.
/// - `company_id` is optional at the type level; the provisioning engine is
///   the only writer allowed to leave it unset, and only within a single
///   provisioning attempt. Everywhere else it must be populated.
/// - `employee_code` is the org-assigned code; unique when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Position,
    pub employee_code: Option<String>,
    pub company_id: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: Option<String>,
        position: Position,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut missing = Vec::new();
        if first_name.trim().is_empty() {
            missing.push("first_name");
        }
        if last_name.trim().is_empty() {
            missing.push("last_name");
        }
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            missing.push("email");
        }
        if !missing.is_empty() {
            return Err(DomainError::validation(missing));
        }

        Ok(Self {
            id,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            phone,
            position,
            employee_code: None,
            company_id: None,
            created_at: now,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether provisioning has completed for this employee.
    pub fn is_attached(&self) -> bool {
        self.company_id.is_some()
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
