use onboard_api::app::AppConfig;

#[tokio::main]
async fn main() {
    onboard_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let owner_email =
        std::env::var("OWNER_EMAIL").unwrap_or_else(|_| "owner@onboard.local".to_string());
    let owner_password = std::env::var("OWNER_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("OWNER_PASSWORD not set; using insecure dev default");
        "owner-dev-password".to_string()
    });
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = onboard_api::app::build_app(AppConfig {
        jwt_secret,
        owner_email,
        owner_password,
    })
    .expect("failed to build application");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
