//! Community actions: the downstream side of the webhook.
//!
//! This module provides:
//! - The [`CommunityActions`] trait the dispatcher calls into
//! - Command messages for the `community_actions` queue
//! - A RabbitMQ publisher implementing the trait
//!
//! ## Architecture
//!
//! ```text
//! Web Server → community_actions queue → community store consumer
//! ```

pub mod commands;
pub mod publisher;

#[cfg(test)]
pub(crate) mod testing;

use anyhow::Result;
use async_trait::async_trait;

pub use commands::{CommunityCommand, NewCommunity, DEFAULT_COMMUNITY_BIO};
pub use publisher::Publisher;

/// Mutations the community store accepts.
///
/// Calls are awaited once and never retried here; a failure is reported to
/// the webhook sender, whose redelivery covers retries.
#[async_trait]
pub trait CommunityActions: Send + Sync {
    async fn create_community(&self, community: NewCommunity) -> Result<()>;

    async fn add_member(&self, community_id: &str, member_id: &str) -> Result<()>;

    async fn remove_member(&self, user_id: &str, community_id: &str) -> Result<()>;

    async fn update_community_info(
        &self,
        community_id: &str,
        name: &str,
        username: &str,
        image: &str,
    ) -> Result<()>;

    async fn delete_community(&self, community_id: &str) -> Result<()>;
}
