//! Svix webhook signature verification.
//!
//! Clerk delivers webhooks through Svix, which signs
//! `"{svix-id}.{svix-timestamp}.{body}"` with HMAC-SHA256 and sends the
//! base64 digest in `svix-signature` as space-separated `v1,<sig>` entries.
//! Reference: https://docs.svix.com/receiving/verifying-payloads/how-manual

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

pub const SVIX_ID_HEADER: &str = "svix-id";
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";

/// Reasons a delivery fails verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("webhook secret is not valid base64")]
    InvalidSecret,
    #[error("svix-timestamp is not a unix timestamp")]
    InvalidTimestamp,
    #[error("message timestamp too old")]
    TimestampTooOld,
    #[error("message timestamp too new")]
    TimestampTooNew,
    #[error("no matching signature found")]
    NoMatchingSignature,
}

/// The three Svix headers every delivery must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvixHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl SvixHeaders {
    /// Extract the Svix headers, returning `None` if any is missing or blank.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            id: get(SVIX_ID_HEADER)?,
            timestamp: get(SVIX_TIMESTAMP_HEADER)?,
            signature: get(SVIX_SIGNATURE_HEADER)?,
        })
    }
}

/// Verifier bound to one endpoint secret.
#[derive(Clone)]
pub struct Webhook {
    keyed: HmacSha256,
    tolerance_secs: u64,
}

impl Webhook {
    /// Build a verifier from a `whsec_`-prefixed (or bare) base64 secret.
    pub fn new(secret: &str, tolerance_secs: u64) -> Result<Self, SignatureError> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);

        let key = STANDARD
            .decode(encoded)
            .map_err(|_| SignatureError::InvalidSecret)?;
        let keyed =
            HmacSha256::new_from_slice(&key).map_err(|_| SignatureError::InvalidSecret)?;

        Ok(Self {
            keyed,
            tolerance_secs,
        })
    }

    /// Verify `payload` against the Svix headers using the current time.
    pub fn verify(&self, payload: &[u8], headers: &SvixHeaders) -> Result<(), SignatureError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.verify_at(payload, headers, now)
    }

    fn verify_at(
        &self,
        payload: &[u8],
        headers: &SvixHeaders,
        now: u64,
    ) -> Result<(), SignatureError> {
        let timestamp: u64 = headers.timestamp.parse().map_err(|_| {
            warn!(timestamp = %headers.timestamp, "svix_signature_invalid_timestamp");
            SignatureError::InvalidTimestamp
        })?;

        if now > timestamp && now - timestamp > self.tolerance_secs {
            warn!(
                webhook_time = timestamp,
                current_time = now,
                tolerance_secs = self.tolerance_secs,
                "svix_signature_stale"
            );
            return Err(SignatureError::TimestampTooOld);
        }

        if timestamp > now && timestamp - now > self.tolerance_secs {
            warn!(
                webhook_time = timestamp,
                current_time = now,
                tolerance_secs = self.tolerance_secs,
                "svix_signature_from_future"
            );
            return Err(SignatureError::TimestampTooNew);
        }

        let mac = self.mac(&headers.id, &headers.timestamp, payload);

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|sig| mac.clone().verify_slice(&sig).is_ok());

        if !matched {
            warn!(
                msg_id = %headers.id,
                candidates = headers.signature.split_whitespace().count(),
                "svix_signature_mismatch"
            );
            return Err(SignatureError::NoMatchingSignature);
        }

        Ok(())
    }

    /// Produce the `v1,<base64>` signature Svix would send for this delivery.
    pub fn sign(&self, msg_id: &str, timestamp: u64, payload: &[u8]) -> String {
        let mac = self.mac(msg_id, &timestamp.to_string(), payload);
        format!(
            "{},{}",
            SIGNATURE_VERSION,
            STANDARD.encode(mac.finalize().into_bytes())
        )
    }

    fn mac(&self, msg_id: &str, timestamp: &str, payload: &[u8]) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }
}
