//! Webhook endpoint handlers.
//!
//! The Clerk handler runs a fixed pipeline and stops at the first failure:
//! 1. Require the Svix headers
//! 2. Require a configured secret
//! 3. Verify the signature over the raw body
//! 4. Parse the typed event
//! 5. Dispatch it to the community store

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::actions::CommunityActions;
use crate::dispatch::{dispatch_event, Outcome};
use crate::events::{ClerkEvent, EventError};
use crate::web::error::WebhookError;
use crate::web::signature::{SignatureError, SvixHeaders, Webhook};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Option<Arc<Webhook>>,
    pub actions: Arc<dyn CommunityActions>,
}

impl AppState {
    /// Build state, binding the verifier to the configured secret.
    ///
    /// A secret that is present but not valid base64 is an error; an absent
    /// secret is not, and makes the webhook endpoint answer 500.
    pub fn new(
        config: Config,
        actions: Arc<dyn CommunityActions>,
    ) -> Result<Self, SignatureError> {
        let verifier = match config.webhook_secret.as_deref() {
            Some(secret) if config.has_webhook_secret() => Some(Arc::new(Webhook::new(
                secret,
                config.webhook_tolerance_secs,
            )?)),
            _ => None,
        };

        Ok(Self {
            config: Arc::new(config),
            verifier,
            actions,
        })
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Clerk Webhook
// =============================================================================

/// Webhook response body.
///
/// Rejections carry `error`; everything else carries `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl WebhookResponse {
    pub fn message(message: &'static str) -> Self {
        Self {
            message: Some(message),
            error: None,
        }
    }

    pub fn error(error: &'static str) -> Self {
        Self {
            message: None,
            error: Some(error),
        }
    }
}

impl From<Outcome> for (StatusCode, Json<WebhookResponse>) {
    fn from(outcome: Outcome) -> Self {
        (outcome.status, Json(WebhookResponse::message(outcome.message)))
    }
}

/// Clerk (Svix) webhook endpoint.
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), WebhookError> {
    let svix = SvixHeaders::from_headers(&headers).ok_or(WebhookError::MissingHeaders)?;

    info!(
        msg_id = %svix.id,
        timestamp = %svix.timestamp,
        body_length = body.len(),
        "clerk_webhook_received"
    );

    let verifier = state.verifier.as_ref().ok_or_else(|| {
        error!(
            env_var = crate::config::WEBHOOK_SECRET_VAR,
            "clerk_webhook_secret_missing"
        );
        WebhookError::MissingSecret
    })?;

    verifier.verify(&body, &svix)?;

    let event = match ClerkEvent::parse(&body) {
        Ok(event) => event,
        Err(EventError::UnknownType(event_type)) => {
            warn!(msg_id = %svix.id, event_type = %event_type, "clerk_event_unrecognized");
            return Ok(Outcome::processed().into());
        }
        Err(e) => return Err(e.into()),
    };

    info!(msg_id = %svix.id, event_type = %event.kind(), "clerk_event_verified");

    let outcome = dispatch_event(event, state.actions.as_ref()).await?;

    Ok(outcome.into())
}
