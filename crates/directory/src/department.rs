//! Department entity: an employee sub-grouping under a company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_core::{AdminId, CompanyId, DepartmentId, DomainError, DomainResult, Entity};

/// A department belongs to exactly one company and is administered by that
/// company's admin. Name uniqueness (per company) is store-enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub company_id: CompanyId,
    pub admin_id: AdminId,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(
        id: DepartmentId,
        name: &str,
        company_id: CompanyId,
        admin_id: AdminId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(["department_name"]));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            company_id,
            admin_id,
            created_at: now,
        })
    }
}

impl Entity for Department {
    type Id = DepartmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_name_is_required_and_trimmed() {
        assert!(Department::new(
            DepartmentId::new(),
            "  ",
            CompanyId::new(),
            AdminId::new(),
            Utc::now()
        )
        .is_err());

        let d = Department::new(
            DepartmentId::new(),
            " Engineering ",
            CompanyId::new(),
            AdminId::new(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(d.name, "Engineering");
    }
}
