//! Group entity: a trainee grouping under a department.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_core::{AdminId, DepartmentId, DomainError, DomainResult, Entity, GroupId, SupervisorId};

/// A group lives under a department and is run by a supervisor on behalf of
/// the company admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub department_id: DepartmentId,
    pub admin_id: AdminId,
    pub supervisor_id: SupervisorId,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(
        id: GroupId,
        name: &str,
        department_id: DepartmentId,
        admin_id: AdminId,
        supervisor_id: SupervisorId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(["group_name"]));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            department_id,
            admin_id,
            supervisor_id,
            created_at: now,
        })
    }
}

impl Entity for Group {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_is_required() {
        let err = Group::new(
            GroupId::new(),
            "",
            DepartmentId::new(),
            AdminId::new(),
            SupervisorId::new(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
