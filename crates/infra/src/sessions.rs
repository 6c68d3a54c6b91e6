//! Session manager: polymorphic authentication across the role tables.

use std::sync::Arc;

use chrono::{Duration, Utc};

use onboard_auth::{
    AuthClaims, AuthError, CredentialStore, RoleKind, RoleRef, Session, TokenCodec,
};
use onboard_core::{DomainError, SessionId};

use crate::store::Store;

/// Token lifetime.
fn session_ttl() -> Duration {
    Duration::hours(1)
}

/// What a validated token proves: a subject in exactly one role table,
/// bound to a still-active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub subject: RoleRef,
    pub session_id: SessionId,
}

impl TokenIdentity {
    pub fn role(&self) -> RoleKind {
        self.subject.kind()
    }

    /// Per-resource role guard. A token minted for one role never passes
    /// another role's check.
    pub fn require_role(&self, required: RoleKind) -> Result<(), AuthError> {
        if self.role() == required {
            Ok(())
        } else {
            Err(AuthError::Invalid)
        }
    }
}

pub struct SessionManager<S> {
    store: Arc<S>,
    credentials: CredentialStore,
    codec: Arc<dyn TokenCodec>,
}

impl<S: Store> SessionManager<S> {
    pub fn new(store: Arc<S>, codec: Arc<dyn TokenCodec>) -> Self {
        Self {
            store,
            credentials: CredentialStore::new(),
            codec,
        }
    }

    /// Authenticate against exactly the role table named by `role`.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller; both are "invalid credentials".
    pub fn authenticate(
        &self,
        role: RoleKind,
        email: &str,
        password: &str,
    ) -> Result<(Session, String), AuthError> {
        let email = email.trim().to_lowercase();

        let (subject, digest) = match role {
            RoleKind::Admin => {
                let account = self
                    .store
                    .find_admin_by_email(&email)?
                    .ok_or(AuthError::NotFound)?;
                (RoleRef::Admin(account.id), account.password_hash)
            }
            RoleKind::Supervisor => {
                let account = self
                    .store
                    .find_supervisor_by_email(&email)?
                    .ok_or(AuthError::NotFound)?;
                (RoleRef::Supervisor(account.id), account.password_hash)
            }
            RoleKind::Trainee => {
                let account = self
                    .store
                    .find_trainee_by_email(&email)?
                    .ok_or(AuthError::NotFound)?;
                (RoleRef::Trainee(account.id), account.password_hash)
            }
            RoleKind::Owner => {
                let account = self
                    .store
                    .find_owner_by_email(&email)?
                    .ok_or(AuthError::NotFound)?;
                (RoleRef::Owner(account.id), account.password_hash)
            }
        };

        if !self.credentials.verify(password, &digest) {
            return Err(AuthError::BadCredential);
        }

        let now = Utc::now();
        let session = Session::open(SessionId::new(), subject, now);
        self.store.insert_session(session.clone())?;

        let claims = AuthClaims {
            sub: subject.subject_uuid(),
            role,
            session_id: session.id,
            issued_at: now,
            expires_at: now + session_ttl(),
        };
        let token = self.codec.mint(&claims)?;

        tracing::info!(session_id = %session.id, %role, "session opened");
        Ok((session, token))
    }

    /// Close a session. Idempotent: an already-closed session stays as it
    /// was; an unknown id is `NotFound`.
    pub fn logout(&self, session_id: SessionId) -> Result<(), AuthError> {
        let mut session = self
            .store
            .get_session(session_id)?
            .ok_or(AuthError::Domain(DomainError::NotFound))?;
        session.close(Utc::now());
        self.store.update_session(session)?;
        tracing::info!(%session_id, "session closed");
        Ok(())
    }

    /// Decode + verify a token and confirm its session is still live and
    /// its subject row still exists, in the role table the token names and
    /// never any other.
    pub fn validate(&self, token: &str) -> Result<TokenIdentity, AuthError> {
        let claims = self.codec.decode(token, Utc::now())?;

        let session = self
            .store
            .get_session(claims.session_id)?
            .ok_or(AuthError::Invalid)?;
        if !session.is_active || session.subject != claims.subject() {
            return Err(AuthError::Invalid);
        }

        let subject_exists = match session.subject {
            RoleRef::Admin(id) => self.store.get_admin(id)?.is_some(),
            RoleRef::Supervisor(id) => self.store.get_supervisor(id)?.is_some(),
            RoleRef::Trainee(id) => self.store.get_trainee(id)?.is_some(),
            RoleRef::Owner(id) => self.store.get_owner(id)?.is_some(),
        };
        if !subject_exists {
            return Err(AuthError::Invalid);
        }

        Ok(TokenIdentity {
            subject: session.subject,
            session_id: session.id,
        })
    }
}
