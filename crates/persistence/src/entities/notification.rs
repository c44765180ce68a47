//! Manager notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::notification::NotificationType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub notification_type: NotificationType,
    pub user_id: Uuid,
    pub manager_id: Uuid,
    pub user_phone: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}
