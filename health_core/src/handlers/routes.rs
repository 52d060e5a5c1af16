//! Explicit route table for the service.

use axum::{routing::get, Router};

use super::health::{handle_health, handle_liveness, handle_readiness};
use crate::AppState;

pub const WELCOME_MESSAGE: &str = "NestJS API is running! 🚀";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/health/liveness", get(handle_liveness))
        .route("/health/readiness", get(handle_readiness))
}

async fn handle_root() -> &'static str {
    WELCOME_MESSAGE
}
