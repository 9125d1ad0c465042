//! HTTP adapter: axum routes, handlers and DTOs.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AppState, SESSION_COOKIE};
pub use routes::app_router;
