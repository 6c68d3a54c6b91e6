//! Notification dispatch: fire-and-forget collaborator.
//!
//! The core never waits on or rolls back for a notification; a failing
//! dispatcher is logged and forgotten.

use onboard_core::{AdminId, CompanyId, RequestId};

/// Events the platform announces after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    RegistrationSubmitted {
        request_id: RequestId,
    },
    CompanyProvisioned {
        request_id: RequestId,
        company_id: CompanyId,
        admin_id: AdminId,
    },
    RegistrationRejected {
        request_id: RequestId,
    },
}

/// Dispatch boundary. Implementations must not block the caller on
/// delivery; lossy is acceptable.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: Notification);
}

/// Default dispatcher: structured log lines.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: Notification) {
        match event {
            Notification::RegistrationSubmitted { request_id } => {
                tracing::info!(%request_id, "registration request submitted");
            }
            Notification::CompanyProvisioned {
                request_id,
                company_id,
                admin_id,
            } => {
                tracing::info!(%request_id, %company_id, %admin_id, "company provisioned");
            }
            Notification::RegistrationRejected { request_id } => {
                tracing::info!(%request_id, "registration request rejected");
            }
        }
    }
}
