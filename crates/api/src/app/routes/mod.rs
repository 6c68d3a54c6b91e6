use axum::Router;

pub mod auth;
pub mod directory;
pub mod registration;
pub mod system;

/// Routes reachable without a session token: application submission and
/// the login/logout pair.
pub fn public_router() -> Router {
    Router::new()
        .merge(registration::public_router())
        .nest("/auth", auth::router())
}

/// Owner-facing review and inspection routes (token required).
pub fn protected_router() -> Router {
    Router::new()
        .merge(registration::review_router())
        .merge(directory::router())
}
