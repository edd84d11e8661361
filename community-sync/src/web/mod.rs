//! Web server module for the Clerk webhook endpoint.
//!
//! This module provides:
//! - Svix signature verification
//! - The webhook and health handlers
//! - The router the server binary mounts

pub mod error;
pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::WebhookError;
pub use handlers::{clerk_webhook, health, AppState, HealthResponse, WebhookResponse};
pub use signature::{SignatureError, SvixHeaders, Webhook};

/// Path Clerk delivers webhooks to.
pub const CLERK_WEBHOOK_PATH: &str = "/api/webhook/clerk";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(CLERK_WEBHOOK_PATH, post(clerk_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
