//! Clerk event model.
//!
//! A delivery is an envelope `{ data, object, type }`. Parsing happens in two
//! steps: the envelope first, then `data` against the schema its `type` selects.
//!
//! ```text
//! raw body → EventEnvelope → EventKind → ClerkEvent
//! ```

pub mod types;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub use types::{
    InvitationCreated, Membership, OrganizationCreated, OrganizationDeleted, OrganizationRef,
    OrganizationUpdated, PublicUserData, UserData, UserDeleted,
};

/// Raw provider envelope, before `data` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub object: String,
    #[serde(rename = "type")]
    pub event_type: String,
}

/// Every event type this endpoint subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OrganizationCreated,
    OrganizationInvitationCreated,
    OrganizationMembershipCreated,
    OrganizationMembershipDeleted,
    OrganizationUpdated,
    OrganizationDeleted,
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::OrganizationCreated,
        EventKind::OrganizationInvitationCreated,
        EventKind::OrganizationMembershipCreated,
        EventKind::OrganizationMembershipDeleted,
        EventKind::OrganizationUpdated,
        EventKind::OrganizationDeleted,
        EventKind::UserCreated,
        EventKind::UserUpdated,
        EventKind::UserDeleted,
    ];

    /// Wire name, as sent in the envelope's `type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OrganizationCreated => "organization.created",
            EventKind::OrganizationInvitationCreated => "organizationInvitation.created",
            EventKind::OrganizationMembershipCreated => "organizationMembership.created",
            EventKind::OrganizationMembershipDeleted => "organizationMembership.deleted",
            EventKind::OrganizationUpdated => "organization.updated",
            EventKind::OrganizationDeleted => "organization.deleted",
            EventKind::UserCreated => "user.created",
            EventKind::UserUpdated => "user.updated",
            EventKind::UserDeleted => "user.deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventError::UnknownType(s.to_string()))
    }
}

/// A verified delivery with its payload parsed for its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClerkEvent {
    OrganizationCreated(OrganizationCreated),
    OrganizationInvitationCreated(InvitationCreated),
    OrganizationMembershipCreated(Membership),
    OrganizationMembershipDeleted(Membership),
    OrganizationUpdated(OrganizationUpdated),
    OrganizationDeleted(OrganizationDeleted),
    UserCreated(UserData),
    UserUpdated(UserData),
    UserDeleted(UserDeleted),
}

/// Why a body could not be turned into a [`ClerkEvent`].
#[derive(Debug, Error)]
pub enum EventError {
    #[error("body is not a webhook envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),
    #[error("unrecognized event type: {0}")]
    UnknownType(String),
    #[error("invalid data for {kind}: {source}")]
    InvalidData {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

impl ClerkEvent {
    /// Parse a raw (already verified) request body.
    pub fn parse(body: &[u8]) -> Result<Self, EventError> {
        let envelope: EventEnvelope =
            serde_json::from_slice(body).map_err(EventError::InvalidEnvelope)?;
        Self::from_envelope(envelope)
    }

    /// Interpret `data` according to the envelope's `type`.
    pub fn from_envelope(envelope: EventEnvelope) -> Result<Self, EventError> {
        if envelope.object != "event" {
            warn!(object = %envelope.object, "clerk_envelope_unexpected_object");
        }

        let kind: EventKind = envelope.event_type.parse()?;
        let data = envelope.data;

        let event = match kind {
            EventKind::OrganizationCreated => Self::OrganizationCreated(decode(kind, data)?),
            EventKind::OrganizationInvitationCreated => {
                Self::OrganizationInvitationCreated(decode(kind, data)?)
            }
            EventKind::OrganizationMembershipCreated => {
                Self::OrganizationMembershipCreated(decode(kind, data)?)
            }
            EventKind::OrganizationMembershipDeleted => {
                Self::OrganizationMembershipDeleted(decode(kind, data)?)
            }
            EventKind::OrganizationUpdated => Self::OrganizationUpdated(decode(kind, data)?),
            EventKind::OrganizationDeleted => Self::OrganizationDeleted(decode(kind, data)?),
            EventKind::UserCreated => Self::UserCreated(decode(kind, data)?),
            EventKind::UserUpdated => Self::UserUpdated(decode(kind, data)?),
            EventKind::UserDeleted => Self::UserDeleted(decode(kind, data)?),
        };

        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::OrganizationCreated(_) => EventKind::OrganizationCreated,
            Self::OrganizationInvitationCreated(_) => EventKind::OrganizationInvitationCreated,
            Self::OrganizationMembershipCreated(_) => EventKind::OrganizationMembershipCreated,
            Self::OrganizationMembershipDeleted(_) => EventKind::OrganizationMembershipDeleted,
            Self::OrganizationUpdated(_) => EventKind::OrganizationUpdated,
            Self::OrganizationDeleted(_) => EventKind::OrganizationDeleted,
            Self::UserCreated(_) => EventKind::UserCreated,
            Self::UserUpdated(_) => EventKind::UserUpdated,
            Self::UserDeleted(_) => EventKind::UserDeleted,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(kind: EventKind, data: Value) -> Result<T, EventError> {
    serde_json::from_value(data).map_err(|source| EventError::InvalidData { kind, source })
}
