//! Memberlink server binary.

use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::EnvFilter;

use memberlink::adapters::http::{app_router, AppState};
use memberlink::adapters::redis::RedisKvStore;
use memberlink::adapters::resend::ResendMailer;
use memberlink::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    config.validate()?;

    let store = Arc::new(RedisKvStore::connect(&config.kv).await?);
    let mailer = Arc::new(ResendMailer::new(config.email.clone()));

    let state = AppState {
        // One Redis database backs both namespaces; key prefixes keep the
        // entity kinds apart.
        users: store.clone(),
        sessions: store,
        mailer,
        webhook_secret: config.payment.stripe_webhook_secret.clone(),
        site_url: config.server.site_base().to_string(),
    };

    let app = app_router(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_secs,
    )));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
