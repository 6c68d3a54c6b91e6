use onboard_auth::{AuthError, RoleKind, RoleRef};
use onboard_core::{OwnerId, SessionId};
use onboard_infra::TokenIdentity;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware after token validation; immutable and
/// present on all protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    identity: TokenIdentity,
}

impl AuthContext {
    pub fn new(identity: TokenIdentity) -> Self {
        Self { identity }
    }

    pub fn subject(&self) -> RoleRef {
        self.identity.subject
    }

    pub fn role(&self) -> RoleKind {
        self.identity.role()
    }

    pub fn session_id(&self) -> SessionId {
        self.identity.session_id
    }

    /// The reviewer identity, available only on owner sessions.
    pub fn owner_id(&self) -> Result<OwnerId, AuthError> {
        self.identity.require_role(RoleKind::Owner)?;
        self.identity.subject.as_owner().ok_or(AuthError::Invalid)
    }
}
