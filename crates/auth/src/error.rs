//! Authentication error model.

use thiserror::Error;

use onboard_core::DomainError;

/// Authentication failure.
///
/// `NotFound`, `BadCredential` and `Invalid` deliberately render as the same
/// message: a caller must not be able to tell *which* part of a credential
/// check failed. They stay distinct variants for logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No account with that email in the requested role table.
    #[error("invalid credentials")]
    NotFound,

    /// The password did not verify against the stored digest.
    #[error("invalid credentials")]
    BadCredential,

    /// Token failure: bad signature, expired, or the bound session is gone
    /// or inactive.
    #[error("invalid credentials")]
    Invalid,

    /// Store-level failure (timeout, missing session on logout, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),
}
