//! Registration lifecycle: invitations, YES confirmation, deregistration.

use std::sync::Arc;

use chrono::Utc;
use domain::models::invitation::{CreateInvitationRequest, CreateInvitationResponse};
use domain::models::media_request::CancellationReason;
use domain::models::notification::NotificationType;
use domain::models::UserStatus;
use domain::services::SmsSender;
use persistence::repositories::{InvitationRepository, UserRepository};
use sqlx::PgPool;

use crate::error::ApiError;

const NO_INVITATION_REPLY: &str =
    "No pending invitation found. Please contact your media server administrator.";
const REGISTRATION_CONFIRMED_REPLY: &str =
    "Registration confirmed! You can now send media requests to this number.";
const NOT_REGISTERED_REPLY: &str = "You are not currently registered.";
const DEREGISTERED_REPLY: &str =
    "You have been deregistered and your pending requests have been cancelled.";

/// Invitation SMS body, greeting by nickname when one was provided.
pub fn invite_message(nickname: Option<&str>) -> String {
    let greeting = match nickname {
        Some(name) => format!("Hi {}!", name),
        None => "Hi!".to_string(),
    };
    format!(
        "{} You've been invited to join a Plex media library! Reply YES to confirm your registration.",
        greeting
    )
}

/// Handles invitations and the registration state of requesters.
pub struct RegistrationService {
    users: UserRepository,
    invitations: InvitationRepository,
    sms: Arc<dyn SmsSender>,
}

impl RegistrationService {
    pub fn new(pool: PgPool, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            invitations: InvitationRepository::new(pool),
            sms,
        }
    }

    /// Create a pending invitation and send the invite SMS.
    ///
    /// The invitation row is the durable outcome; an SMS failure is reported
    /// in the response but does not undo the invitation.
    pub async fn invite(
        &self,
        request: &CreateInvitationRequest,
    ) -> Result<CreateInvitationResponse, ApiError> {
        let phone = shared::phone::normalize_phone(&request.phone_number)
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let nickname = request
            .nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let invitation = self
            .invitations
            .create(&phone, request.manager_id, nickname)
            .await?;

        let sms_sent = self
            .sms
            .send(&phone, &invite_message(nickname))
            .await
            .is_sent();

        tracing::info!(
            invitation_id = %invitation.id,
            phone = %phone,
            sms_sent = sms_sent,
            "Invitation created"
        );

        Ok(CreateInvitationResponse {
            id: invitation.id,
            phone_number: phone,
            sms_sent,
        })
    }

    /// Handle a "YES" reply: promote the most recent pending invitation for
    /// this phone into an active user.
    ///
    /// The invitation flip and the user insert run in one guarded
    /// transaction, so a second concurrent "YES" finds nothing to confirm
    /// instead of creating a duplicate user.
    pub async fn confirm(&self, phone: &str) -> Result<String, sqlx::Error> {
        let invitation = match self.invitations.find_pending_by_phone(phone).await? {
            Some(invitation) => invitation,
            None => {
                tracing::info!(phone = %phone, "No pending invitation to confirm");
                return Ok(NO_INVITATION_REPLY.to_string());
            }
        };

        match self
            .users
            .activate_from_invitation(&invitation, Utc::now())
            .await?
        {
            Some(user) => {
                tracing::info!(user_id = %user.id, phone = %phone, "Registration confirmed");
                Ok(REGISTRATION_CONFIRMED_REPLY.to_string())
            }
            None => {
                tracing::info!(invitation_id = %invitation.id, "Invitation was already confirmed");
                Ok(NO_INVITATION_REPLY.to_string())
            }
        }
    }

    /// Handle a "deregister" reply: flip the user out and cancel everything
    /// they have in flight, in one transaction.
    pub async fn deregister(&self, phone: &str) -> Result<String, sqlx::Error> {
        let user = match self.users.find_active_by_phone(phone).await? {
            Some(user) => user,
            None => {
                tracing::info!(phone = %phone, "Deregister from unknown number");
                return Ok(NOT_REGISTERED_REPLY.to_string());
            }
        };

        let outcome = self
            .users
            .deactivate_cascade(
                &user,
                UserStatus::Deregistered,
                CancellationReason::UserDeregistered,
                NotificationType::UserDeregistered,
                Utc::now(),
            )
            .await?;

        tracing::info!(
            user_id = %user.id,
            requests_cancelled = outcome.requests_cancelled,
            invitations_cancelled = outcome.invitations_cancelled,
            "User deregistered"
        );
        Ok(DEREGISTERED_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_message_with_nickname() {
        assert_eq!(
            invite_message(Some("Alex")),
            "Hi Alex! You've been invited to join a Plex media library! Reply YES to confirm your registration."
        );
    }

    #[test]
    fn test_invite_message_without_nickname() {
        assert_eq!(
            invite_message(None),
            "Hi! You've been invited to join a Plex media library! Reply YES to confirm your registration."
        );
    }
}
