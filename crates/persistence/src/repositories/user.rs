//! User repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::media_request::CancellationReason;
use domain::models::notification::NotificationType;
use domain::models::{PendingInteraction, UserStatus};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InvitationEntity, NotificationEntity, UserEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, phone_number, manager_id, status, nickname, \
     pending_interaction, interaction_version, created_at, deregistered_at";

/// Outcome of a deregistration/removal cascade.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub requests_cancelled: u64,
    pub invitations_cancelled: u64,
    pub notification: NotificationEntity,
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the active user for a phone number.
    pub async fn find_active_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_user_by_phone");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE phone_number = $1 AND status = 'active' \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Confirm an invitation and create its active user in one transaction.
    ///
    /// The invitation flip is guarded on it still being pending, so of two
    /// concurrent confirmations exactly one creates the user; the loser gets
    /// None. The partial unique index on active phone numbers backs this up
    /// at the schema level.
    pub async fn activate_from_invitation(
        &self,
        invitation: &InvitationEntity,
        now: DateTime<Utc>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("activate_user_from_invitation");
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE pending_users SET status = 'confirmed', confirmed_at = $2 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(invitation.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        let user = sqlx::query_as::<_, UserEntity>(&format!(
            "INSERT INTO users (phone_number, manager_id, status, nickname) \
             VALUES ($1, $2, 'active', $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&invitation.phone_number)
        .bind(invitation.manager_id)
        .bind(invitation.nickname.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(user))
    }

    /// Store a pending interaction, guarded by the expected version.
    ///
    /// Returns false when another write won the race; the caller must re-read
    /// and retry or give up.
    pub async fn set_pending_interaction(
        &self,
        user_id: Uuid,
        interaction: &PendingInteraction,
        expected_version: i64,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_pending_interaction");
        let result = sqlx::query(
            "UPDATE users \
             SET pending_interaction = $2, interaction_version = interaction_version + 1 \
             WHERE id = $1 AND interaction_version = $3",
        )
        .bind(user_id)
        .bind(Json(interaction))
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() == 1)
    }

    /// Clear the pending interaction, guarded by the expected version.
    pub async fn clear_pending_interaction(
        &self,
        user_id: Uuid,
        expected_version: i64,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("clear_pending_interaction");
        let result = sqlx::query(
            "UPDATE users \
             SET pending_interaction = NULL, interaction_version = interaction_version + 1 \
             WHERE id = $1 AND interaction_version = $2",
        )
        .bind(user_id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() == 1)
    }

    /// Deactivate a user and cancel everything they have in flight, as one
    /// all-or-nothing commit: the user row flips to `new_status`, pending
    /// media requests and invitations for their phone are cancelled, and a
    /// manager-facing notification is written.
    pub async fn deactivate_cascade(
        &self,
        user: &UserEntity,
        new_status: UserStatus,
        reason: CancellationReason,
        notification_type: NotificationType,
        now: DateTime<Utc>,
    ) -> Result<CascadeOutcome, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_user_cascade");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE users SET status = $2, deregistered_at = $3, \
             pending_interaction = NULL, interaction_version = interaction_version + 1 \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(user.id)
        .bind(new_status)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let requests = sqlx::query(
            "UPDATE media_requests \
             SET status = 'cancelled', cancelled_at = $2, cancellation_reason = $3, updated_at = $2 \
             WHERE requester_phone = $1 AND status = 'pending'",
        )
        .bind(&user.phone_number)
        .bind(now)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        let invitations = sqlx::query(
            "UPDATE pending_users \
             SET status = 'cancelled', cancelled_at = $2, cancellation_reason = $3 \
             WHERE phone_number = $1 AND status = 'pending'",
        )
        .bind(&user.phone_number)
        .bind(now)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        let notification = sqlx::query_as::<_, NotificationEntity>(
            "INSERT INTO notifications (type, user_id, manager_id, user_phone, user_name) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, type, user_id, manager_id, user_phone, user_name, created_at, read",
        )
        .bind(notification_type)
        .bind(user.id)
        .bind(user.manager_id)
        .bind(&user.phone_number)
        .bind(user.nickname.as_deref().unwrap_or("User"))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(CascadeOutcome {
            requests_cancelled: requests.rows_affected(),
            invitations_cancelled: invitations.rows_affected(),
            notification,
        })
    }
}
