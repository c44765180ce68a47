//! Invitation repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InvitationEntity;
use crate::metrics::QueryTimer;

const INVITATION_COLUMNS: &str = "id, phone_number, manager_id, nickname, status, \
     created_at, confirmed_at, cancelled_at, cancellation_reason";

/// Repository for invitation-related database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new pending invitation.
    pub async fn create(
        &self,
        phone: &str,
        manager_id: Uuid,
        nickname: Option<&str>,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "INSERT INTO pending_users (phone_number, manager_id, nickname) \
             VALUES ($1, $2, $3) \
             RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(phone)
        .bind(manager_id)
        .bind(nickname)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the most recent pending invitation for a phone number.
    pub async fn find_pending_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_pending_invitation_by_phone");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM pending_users \
             WHERE phone_number = $1 AND status = 'pending' \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

}
