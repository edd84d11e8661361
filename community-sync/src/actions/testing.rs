use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{CommunityActions, CommunityCommand, NewCommunity};

/// Records every call; optionally fails all of them.
#[derive(Clone, Default)]
pub(crate) struct RecordingActions {
    calls: Arc<Mutex<Vec<CommunityCommand>>>,
    fail: bool,
}

impl RecordingActions {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<CommunityCommand> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, command: CommunityCommand) -> Result<()> {
        self.calls.lock().unwrap().push(command);
        if self.fail {
            bail!("community store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl CommunityActions for RecordingActions {
    async fn create_community(&self, community: NewCommunity) -> Result<()> {
        self.record(CommunityCommand::CreateCommunity(community))
    }

    async fn add_member(&self, community_id: &str, member_id: &str) -> Result<()> {
        self.record(CommunityCommand::AddMember {
            community_id: community_id.to_string(),
            member_id: member_id.to_string(),
        })
    }

    async fn remove_member(&self, user_id: &str, community_id: &str) -> Result<()> {
        self.record(CommunityCommand::RemoveMember {
            user_id: user_id.to_string(),
            community_id: community_id.to_string(),
        })
    }

    async fn update_community_info(
        &self,
        community_id: &str,
        name: &str,
        username: &str,
        image: &str,
    ) -> Result<()> {
        self.record(CommunityCommand::UpdateCommunityInfo {
            community_id: community_id.to_string(),
            name: name.to_string(),
            username: username.to_string(),
            image: image.to_string(),
        })
    }

    async fn delete_community(&self, community_id: &str) -> Result<()> {
        self.record(CommunityCommand::DeleteCommunity {
            community_id: community_id.to_string(),
        })
    }
}
