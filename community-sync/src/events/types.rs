//! Payload schemas for the Clerk events this service understands.
//!
//! Each event type gets its own struct so a malformed `data` object is
//! rejected at parse time instead of leaking empty values downstream.
//! Unknown fields are ignored; Clerk sends far more than we read.

use serde::{Deserialize, Serialize};

/// `organization.created`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationCreated {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_by: String,
}

impl OrganizationCreated {
    /// Community image: the logo, falling back to the generic image.
    pub fn image(&self) -> String {
        pick_image(&self.logo_url, &self.image_url)
    }
}

/// `organization.updated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationUpdated {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl OrganizationUpdated {
    /// Community image: the logo, falling back to the generic image.
    pub fn image(&self) -> String {
        pick_image(&self.logo_url, &self.image_url)
    }
}

/// `organization.deleted`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDeleted {
    pub id: String,
}

/// `organizationInvitation.created`
///
/// Only logged; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationCreated {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// `organizationMembership.created` and `organizationMembership.deleted`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub organization: OrganizationRef,
    pub public_user_data: PublicUserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUserData {
    pub user_id: String,
}

/// `user.created` and `user.updated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
}

/// `user.deleted`
///
/// Clerk may omit the id for users deleted in bulk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDeleted {
    #[serde(default)]
    pub id: Option<String>,
}

fn pick_image(logo_url: &Option<String>, image_url: &Option<String>) -> String {
    logo_url
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| image_url.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}
