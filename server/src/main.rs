mod config;
mod db;
mod envelope;
mod error;
mod routes;
mod services;
mod state;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")))
        .init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    if config.resend.is_none() {
        tracing::warn!("RESEND_API_KEY not set; password reset links will be logged, not emailed");
    }

    let state = state::AppState::new(pool, config);

    // Expired sessions and stale reset tokens are swept in the background.
    let _purge = services::session::spawn_purge_task(state.pool.clone(), PURGE_INTERVAL);

    let app = routes::leptos_app(state).expect("leptos app init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "applytrack listening");
    axum::serve(listener, app).await.expect("server failed");
}
