//! Web server module for handling inbound Bitbucket webhooks.
//!
//! This module provides:
//! - The axum router and handlers
//! - Bitbucket signature verification

pub mod handlers;
pub mod signature;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{bitbucket_webhook, health, AppState, HealthResponse};
pub use signature::{sign_body, verify_signature};

/// Build the HTTP router for the relay.
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/webhooks/bitbucket", post(bitbucket_webhook))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
