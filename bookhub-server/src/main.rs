//! bookhub-server — Online bookstore backend
//!
//! Long-running service that:
//! - Serves the book catalog (filtering, full-text search, best sellers)
//! - Manages user accounts and JWT sessions
//! - Turns carts into orders plus hosted gateway checkout sessions
//! - Reconciles payment status from signed gateway webhooks

mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod state;
mod stripe;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookhub_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting bookhub-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    // Sweep idle rate-limit counters so the map stays bounded
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup(std::time::Duration::from_secs(300));
        }
    });

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("bookhub-server listening on {http_addr}");

    // Connect info feeds the rate limiter's per-IP fallback when no proxy
    // sets x-forwarded-for
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
