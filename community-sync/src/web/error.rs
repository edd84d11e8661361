//! Webhook failure responses.
//!
//! Every failure maps to a fixed status and public body. Details go to the
//! log, never to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::dispatch::DispatchError;
use crate::events::EventError;
use crate::web::handlers::WebhookResponse;
use crate::web::signature::SignatureError;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing svix headers")]
    MissingHeaders,
    #[error("webhook secret is not configured")]
    MissingSecret,
    #[error("signature verification failed: {0}")]
    Verification(#[from] SignatureError),
    #[error("invalid event payload: {0}")]
    InvalidPayload(#[from] EventError),
    #[error(transparent)]
    Action(#[from] DispatchError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingHeaders
            | WebhookError::Verification(_)
            | WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::MissingSecret | WebhookError::Action(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body returned to the webhook sender.
    pub fn body(&self) -> WebhookResponse {
        match self {
            WebhookError::MissingHeaders => WebhookResponse::error("Missing required headers"),
            WebhookError::MissingSecret => WebhookResponse::error("Missing webhook secret"),
            WebhookError::Verification(_) => WebhookResponse::error("Webhook processing failed"),
            WebhookError::InvalidPayload(_) => WebhookResponse::error("Invalid event payload"),
            WebhookError::Action(_) => WebhookResponse::message("Internal Server Error"),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "clerk_webhook_failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "clerk_webhook_rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
