//! Manager entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the managers table.
#[derive(Debug, Clone, FromRow)]
pub struct ManagerEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
