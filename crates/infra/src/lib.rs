//! `onboard-infra` — storage and the cross-entity services.
//!
//! Store traits + the in-memory implementation, the provisioning engine
//! (the one writer allowed to assemble the employee/company/admin
//! triangle), the registration service and the session manager.

pub mod bootstrap;
pub mod in_memory;
pub mod notify;
pub mod provisioning;
pub mod registration;
pub mod sessions;
pub mod store;

pub use in_memory::InMemoryStore;
pub use notify::{Notification, Notifier, TracingNotifier};
pub use provisioning::{ApprovalError, Provisioned, ProvisioningEngine, ProvisioningError};
pub use registration::{NewApplication, RegistrationService};
pub use sessions::{SessionManager, TokenIdentity};
pub use store::Store;
