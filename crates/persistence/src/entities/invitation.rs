//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::media_request::CancellationReason;
use domain::models::InvitationStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the pending_users table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub manager_id: Uuid,
    pub nickname: Option<String>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<CancellationReason>,
}
