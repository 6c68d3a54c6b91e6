//! Process bootstrap helpers.

use chrono::Utc;

use onboard_auth::accounts::OwnerAccount;
use onboard_auth::CredentialStore;
use onboard_core::{DomainError, DomainResult, OwnerId};

use crate::store::Store;

/// Ensure a platform-owner account exists for the given credentials.
///
/// Idempotent: an existing account with that email is returned untouched,
/// so restarting the process never rotates the operator's password.
pub fn seed_owner<S: Store>(
    store: &S,
    email: &str,
    password: &str,
) -> DomainResult<OwnerId> {
    if let Some(existing) = store.find_owner_by_email(email)? {
        return Ok(existing.id);
    }

    let digest = CredentialStore::new()
        .hash(password)
        .map_err(|e| DomainError::conflict(format!("credential hashing failed: {e}")))?;
    let owner = OwnerAccount::new(
        OwnerId::new(),
        "Platform",
        "Operator",
        email,
        digest,
        Utc::now(),
    )?;
    let id = owner.id;
    store.insert_owner(owner)?;
    tracing::info!(owner_id = %id, "seeded platform owner account");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryStore;

    #[test]
    fn seeding_is_idempotent() {
        let store = InMemoryStore::new();
        let first = seed_owner(&store, "op@x.com", "op-secret").unwrap();
        let second = seed_owner(&store, "op@x.com", "rotated").unwrap();
        assert_eq!(first, second);
    }
}
