//! Session entity: one uniform record for every role kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use onboard_core::{Entity, SessionId};

use crate::role::{RoleKind, RoleRef};

/// An authenticated session.
///
/// `subject` carries both the role discriminator and the reference into the
/// corresponding role table. Sessions are never deleted: logout stamps
/// `logout_time` and clears `is_active`, keeping the record as audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub subject: RoleRef,
    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Session {
    /// Open a new active session for an authenticated subject.
    pub fn open(id: SessionId, subject: RoleRef, now: DateTime<Utc>) -> Self {
        Self {
            id,
            subject,
            login_time: now,
            logout_time: None,
            is_active: true,
        }
    }

    pub fn role(&self) -> RoleKind {
        self.subject.kind()
    }

    /// Close the session. Idempotent: closing an already-inactive session
    /// changes nothing and keeps the original logout stamp.
    pub fn close(&mut self, now: DateTime<Utc>) {
        if self.is_active {
            self.is_active = false;
            self.logout_time = Some(now);
        }
    }
}

impl Entity for Session {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
