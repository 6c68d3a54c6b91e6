//! Role discriminator and the polymorphic role reference.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use onboard_core::{AdminId, DomainError, OwnerId, SupervisorId, TraineeId};

/// Which role table an identity lives in.
///
/// The set is closed on purpose: sessions and tokens name their target table
/// through this enum, never through a free-form table-name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Admin,
    Supervisor,
    Trainee,
    Owner,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::Supervisor => "supervisor",
            RoleKind::Trainee => "trainee",
            RoleKind::Owner => "owner",
        }
    }
}

impl core::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(RoleKind::Admin),
            "supervisor" => Ok(RoleKind::Supervisor),
            "trainee" => Ok(RoleKind::Trainee),
            "owner" => Ok(RoleKind::Owner),
            other => Err(DomainError::invalid_id(format!("unknown role: {other}"))),
        }
    }
}

/// A reference into exactly one role table.
///
/// Modeled as a sum type so a reference can never point at a table other
/// than the one its discriminator names: the "dynamic ref" of the data
/// model, resolved at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum RoleRef {
    Admin(AdminId),
    Supervisor(SupervisorId),
    Trainee(TraineeId),
    Owner(OwnerId),
}

impl RoleRef {
    /// The discriminator naming the target table.
    pub fn kind(&self) -> RoleKind {
        match self {
            RoleRef::Admin(_) => RoleKind::Admin,
            RoleRef::Supervisor(_) => RoleKind::Supervisor,
            RoleRef::Trainee(_) => RoleKind::Trainee,
            RoleRef::Owner(_) => RoleKind::Owner,
        }
    }

    /// The raw subject id, untyped.
    pub fn subject_uuid(&self) -> Uuid {
        match self {
            RoleRef::Admin(id) => *id.as_uuid(),
            RoleRef::Supervisor(id) => *id.as_uuid(),
            RoleRef::Trainee(id) => *id.as_uuid(),
            RoleRef::Owner(id) => *id.as_uuid(),
        }
    }

    /// Rebuild a reference from a discriminator + raw id (token decode path).
    pub fn from_parts(kind: RoleKind, subject: Uuid) -> Self {
        match kind {
            RoleKind::Admin => RoleRef::Admin(AdminId::from_uuid(subject)),
            RoleKind::Supervisor => RoleRef::Supervisor(SupervisorId::from_uuid(subject)),
            RoleKind::Trainee => RoleRef::Trainee(TraineeId::from_uuid(subject)),
            RoleKind::Owner => RoleRef::Owner(OwnerId::from_uuid(subject)),
        }
    }

    pub fn as_admin(&self) -> Option<AdminId> {
        match self {
            RoleRef::Admin(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_owner(&self) -> Option<OwnerId> {
        match self {
            RoleRef::Owner(id) => Some(*id),
            _ => None,
        }
    }
}
