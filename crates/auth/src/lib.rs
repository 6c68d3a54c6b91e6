//! `onboard-auth` — identity primitives for the platform.
//!
//! Role-table account records, the credential store, the session entity and
//! the signed-token layer. This crate is intentionally decoupled from HTTP
//! and storage: lookups and session persistence live behind store traits in
//! `onboard-infra`.

pub mod accounts;
pub mod claims;
pub mod credential;
pub mod error;
pub mod role;
pub mod session;
pub mod token;

pub use accounts::{AdminAccount, OwnerAccount, SupervisorAccount, TraineeAccount};
pub use claims::{AuthClaims, TokenValidationError, validate_claims};
pub use credential::CredentialStore;
pub use error::AuthError;
pub use role::{RoleKind, RoleRef};
pub use session::Session;
pub use token::{Hs256TokenCodec, TokenCodec};
