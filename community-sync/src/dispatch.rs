//! Event dispatch.
//!
//! Maps each verified [`ClerkEvent`] to the community action it implies and
//! the acknowledgement the webhook sender receives.
//!
//! ## Dispatch Table
//!
//! ```text
//! organization.created            → create_community       201
//! organizationInvitation.created  → (none)                 201
//! organizationMembership.created  → add_member             201
//! organizationMembership.deleted  → remove_member          201
//! organization.updated            → update_community_info  201
//! organization.deleted            → delete_community       201
//! user.created                    → (none)                 200
//! user.updated / user.deleted     → (none)                 200
//! ```

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, info};

use crate::actions::{CommunityActions, NewCommunity, DEFAULT_COMMUNITY_BIO};
use crate::events::{ClerkEvent, EventKind};

/// Success response for a handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: StatusCode,
    pub message: &'static str,
}

impl Outcome {
    const fn created(message: &'static str) -> Self {
        Self {
            status: StatusCode::CREATED,
            message,
        }
    }

    const fn ok(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            message,
        }
    }

    /// Acknowledgement for deliveries that need no action.
    pub const fn processed() -> Self {
        Self::ok("Webhook processed")
    }
}

/// A community action failed while handling an event.
#[derive(Debug, Error)]
#[error("{kind} action failed: {error:#}")]
pub struct DispatchError {
    pub kind: EventKind,
    pub error: anyhow::Error,
}

/// Run the action for `event` and report the outcome.
pub async fn dispatch_event(
    event: ClerkEvent,
    actions: &dyn CommunityActions,
) -> Result<Outcome, DispatchError> {
    let kind = event.kind();
    info!(event_type = %kind, "clerk_event_dispatch");

    let result = match event {
        ClerkEvent::OrganizationCreated(org) => {
            let image = org.image();
            actions
                .create_community(NewCommunity {
                    id: org.id,
                    name: org.name,
                    username: org.slug,
                    image,
                    bio: DEFAULT_COMMUNITY_BIO.to_string(),
                    created_by: org.created_by,
                })
                .await
                .map(|_| Outcome::created("Organization created"))
        }
        ClerkEvent::OrganizationInvitationCreated(invitation) => {
            info!(
                invitation_id = invitation.id.as_deref().unwrap_or("unknown"),
                organization_id = invitation.organization_id.as_deref().unwrap_or("unknown"),
                role = invitation.role.as_deref().unwrap_or("unknown"),
                "clerk_invitation_created"
            );
            Ok(Outcome::created("Invitation created"))
        }
        ClerkEvent::OrganizationMembershipCreated(membership) => actions
            .add_member(
                &membership.organization.id,
                &membership.public_user_data.user_id,
            )
            .await
            .map(|_| Outcome::created("Invitation accepted")),
        ClerkEvent::OrganizationMembershipDeleted(membership) => actions
            .remove_member(
                &membership.public_user_data.user_id,
                &membership.organization.id,
            )
            .await
            .map(|_| Outcome::created("Member removed")),
        ClerkEvent::OrganizationUpdated(org) => actions
            .update_community_info(&org.id, &org.name, &org.slug, &org.image())
            .await
            .map(|_| Outcome::created("Organization updated")),
        ClerkEvent::OrganizationDeleted(org) => actions
            .delete_community(&org.id)
            .await
            .map(|_| Outcome::created("Organization deleted")),
        ClerkEvent::UserCreated(user) => {
            info!(user_id = %user.id, "clerk_user_created");
            Ok(Outcome::ok("User event received"))
        }
        // Users are not mirrored into the community store
        ClerkEvent::UserUpdated(user) => {
            info!(user_id = %user.id, "clerk_user_updated");
            Ok(Outcome::processed())
        }
        ClerkEvent::UserDeleted(user) => {
            info!(
                user_id = user.id.as_deref().unwrap_or("unknown"),
                "clerk_user_deleted"
            );
            Ok(Outcome::processed())
        }
    };

    match result {
        Ok(outcome) => {
            info!(
                event_type = %kind,
                status = outcome.status.as_u16(),
                "clerk_event_handled"
            );
            Ok(outcome)
        }
        Err(e) => {
            error!(event_type = %kind, error = ?e, "clerk_event_action_failed");
            Err(DispatchError { kind, error: e })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::RecordingActions;
    use crate::actions::CommunityCommand;
    use crate::events::{
        InvitationCreated, Membership, OrganizationCreated, OrganizationDeleted, OrganizationRef,
        OrganizationUpdated, PublicUserData, UserData, UserDeleted,
    };

    fn organization_created(logo_url: Option<&str>, image_url: Option<&str>) -> ClerkEvent {
        ClerkEvent::OrganizationCreated(OrganizationCreated {
            id: "org_1".to_string(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            logo_url: logo_url.map(str::to_string),
            image_url: image_url.map(str::to_string),
            created_by: "user_1".to_string(),
        })
    }

    fn membership() -> Membership {
        Membership {
            organization: OrganizationRef {
                id: "org_1".to_string(),
            },
            public_user_data: PublicUserData {
                user_id: "user_2".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_organization_created_calls_create_community() {
        let actions = RecordingActions::default();

        let event = organization_created(Some("http://x/logo.png"), None);

        let outcome = dispatch_event(event, &actions).await.unwrap();

        assert_eq!(outcome, Outcome::created("Organization created"));
        assert_eq!(
            actions.calls(),
            vec![CommunityCommand::CreateCommunity(NewCommunity {
                id: "org_1".to_string(),
                name: "Acme".to_string(),
                username: "acme".to_string(),
                image: "http://x/logo.png".to_string(),
                bio: "org bio".to_string(),
                created_by: "user_1".to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn test_organization_created_image_fallback() {
        let actions = RecordingActions::default();

        dispatch_event(organization_created(None, Some("http://x/img.png")), &actions)
            .await
            .unwrap();

        match &actions.calls()[0] {
            CommunityCommand::CreateCommunity(c) => assert_eq!(c.image, "http://x/img.png"),
            other => panic!("Expected CreateCommunity, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_action_failure_is_dispatch_error() {
        let actions = RecordingActions::failing();

        let err = dispatch_event(organization_created(None, None), &actions)
            .await
            .unwrap_err();

        assert_eq!(err.kind, EventKind::OrganizationCreated);
        assert!(err.to_string().contains("community store unavailable"));
    }

    #[tokio::test]
    async fn test_membership_created_adds_member() {
        let actions = RecordingActions::default();

        let event = ClerkEvent::OrganizationMembershipCreated(membership());

        let outcome = dispatch_event(event, &actions).await.unwrap();

        assert_eq!(outcome.status, StatusCode::CREATED);
        assert_eq!(outcome.message, "Invitation accepted");
        assert_eq!(
            actions.calls(),
            vec![CommunityCommand::AddMember {
                community_id: "org_1".to_string(),
                member_id: "user_2".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_membership_deleted_removes_member() {
        let actions = RecordingActions::default();

        let event = ClerkEvent::OrganizationMembershipDeleted(membership());

        let outcome = dispatch_event(event, &actions).await.unwrap();

        assert_eq!(outcome.message, "Member removed");
        assert_eq!(
            actions.calls(),
            vec![CommunityCommand::RemoveMember {
                user_id: "user_2".to_string(),
                community_id: "org_1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_organization_updated_updates_info() {
        let actions = RecordingActions::default();
        let event = ClerkEvent::OrganizationUpdated(OrganizationUpdated {
            id: "org_1".to_string(),
            name: "Acme Inc".to_string(),
            slug: "acme-inc".to_string(),
            logo_url: None,
            image_url: Some("http://x/img.png".to_string()),
        });

        let outcome = dispatch_event(event, &actions).await.unwrap();

        assert_eq!(outcome.message, "Organization updated");
        assert_eq!(
            actions.calls(),
            vec![CommunityCommand::UpdateCommunityInfo {
                community_id: "org_1".to_string(),
                name: "Acme Inc".to_string(),
                username: "acme-inc".to_string(),
                image: "http://x/img.png".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_organization_deleted_deletes_community() {
        let actions = RecordingActions::default();
        let event = ClerkEvent::OrganizationDeleted(OrganizationDeleted {
            id: "org_1".to_string(),
        });

        let outcome = dispatch_event(event, &actions).await.unwrap();

        assert_eq!(outcome.message, "Organization deleted");
        assert_eq!(
            actions.calls(),
            vec![CommunityCommand::DeleteCommunity {
                community_id: "org_1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_events_without_actions() {
        let cases = [
            (
                ClerkEvent::OrganizationInvitationCreated(InvitationCreated::default()),
                Outcome::created("Invitation created"),
            ),
            (
                ClerkEvent::UserCreated(UserData {
                    id: "user_1".to_string(),
                }),
                Outcome::ok("User event received"),
            ),
            (
                ClerkEvent::UserUpdated(UserData {
                    id: "user_1".to_string(),
                }),
                Outcome::processed(),
            ),
            (
                ClerkEvent::UserDeleted(UserDeleted::default()),
                Outcome::processed(),
            ),
        ];

        // A failing store proves no action is attempted
        let actions = RecordingActions::failing();
        for (event, expected) in cases {
            assert_eq!(dispatch_event(event, &actions).await.unwrap(), expected);
        }
        assert!(actions.calls().is_empty());
    }
}
