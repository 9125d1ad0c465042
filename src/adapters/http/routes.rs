//! Axum router for the membership backend.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_member, health, logout, process_webhook, request_login, verify_token, AppState,
};

/// Builds the full application router.
///
/// Routes:
/// - `POST /webhook` - payment provider events (signature verified)
/// - `POST /auth/request-login` - magic-link request
/// - `GET  /auth/verify` - token verification, session creation
/// - `POST /auth/logout` - session teardown
/// - `GET  /api/member` - authenticated member record
/// - `GET  /health` - liveness probe
///
/// CORS is permissive: the browser-facing endpoints are same-site in
/// practice and the webhook endpoint authenticates by signature.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(process_webhook))
        .route("/auth/request-login", post(request_login))
        .route("/auth/verify", get(verify_token))
        .route("/auth/logout", post(logout))
        .route("/api/member", get(get_member))
        .route("/health", get(health))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
