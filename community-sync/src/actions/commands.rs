//! Community command messages for the `community_actions` queue.
//!
//! The consumer on the other side owns the database; these messages are the
//! full contract between the two.

use serde::{Deserialize, Serialize};

/// Placeholder bio given to communities created from an organization.
pub const DEFAULT_COMMUNITY_BIO: &str = "org bio";

/// Arguments for creating a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommunity {
    /// Clerk organization id, reused as the community id
    pub id: String,
    pub name: String,
    /// Organization slug, stored as the community username
    pub username: String,
    /// Empty when the organization has no image
    pub image: String,
    pub bio: String,
    /// Clerk user id of the creator
    pub created_by: String,
}

/// One mutation of the community store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CommunityCommand {
    CreateCommunity(NewCommunity),
    AddMember {
        community_id: String,
        member_id: String,
    },
    RemoveMember {
        user_id: String,
        community_id: String,
    },
    UpdateCommunityInfo {
        community_id: String,
        name: String,
        username: String,
        image: String,
    },
    DeleteCommunity {
        community_id: String,
    },
}

impl CommunityCommand {
    /// Snake-case action name, as it appears in the `action` tag.
    pub fn action(&self) -> &'static str {
        match self {
            CommunityCommand::CreateCommunity(_) => "create_community",
            CommunityCommand::AddMember { .. } => "add_member",
            CommunityCommand::RemoveMember { .. } => "remove_member",
            CommunityCommand::UpdateCommunityInfo { .. } => "update_community_info",
            CommunityCommand::DeleteCommunity { .. } => "delete_community",
        }
    }

    /// The community this command touches.
    pub fn community_id(&self) -> &str {
        match self {
            CommunityCommand::CreateCommunity(c) => &c.id,
            CommunityCommand::AddMember { community_id, .. }
            | CommunityCommand::RemoveMember { community_id, .. }
            | CommunityCommand::UpdateCommunityInfo { community_id, .. }
            | CommunityCommand::DeleteCommunity { community_id } => community_id,
        }
    }

    /// Broker message id, used for tracing deliveries.
    pub fn message_id(&self) -> String {
        format!("{}-{}", self.action(), self.community_id())
    }
}
