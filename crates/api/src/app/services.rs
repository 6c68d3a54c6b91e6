use std::sync::Arc;

use onboard_auth::Hs256TokenCodec;
use onboard_core::DomainResult;
use onboard_infra::{
    bootstrap, InMemoryStore, RegistrationService, SessionManager, TracingNotifier,
};

use crate::app::AppConfig;

/// Everything the route handlers need, wired once at startup.
pub struct AppServices {
    pub store: Arc<InMemoryStore>,
    pub registration: RegistrationService<InMemoryStore>,
    pub sessions: Arc<SessionManager<InMemoryStore>>,
}

pub fn build_services(config: &AppConfig) -> DomainResult<AppServices> {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(TracingNotifier);
    let codec = Arc::new(Hs256TokenCodec::new(config.jwt_secret.as_bytes()));

    bootstrap::seed_owner(&*store, &config.owner_email, &config.owner_password)?;

    let registration = RegistrationService::new(store.clone(), notifier);
    let sessions = Arc::new(SessionManager::new(store.clone(), codec));

    Ok(AppServices {
        store,
        registration,
        sessions,
    })
}
