//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{PendingInteraction, UserStatus};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
///
/// `interaction_version` increments on every pending_interaction write and is
/// the compare-and-swap token guarding concurrent replies from one sender.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub phone_number: String,
    pub manager_id: Uuid,
    pub status: UserStatus,
    pub nickname: Option<String>,
    pub pending_interaction: Option<Json<PendingInteraction>>,
    pub interaction_version: i64,
    pub created_at: DateTime<Utc>,
    pub deregistered_at: Option<DateTime<Utc>>,
}

impl UserEntity {
    /// The stored pending interaction, if any.
    pub fn interaction(&self) -> Option<&PendingInteraction> {
        self.pending_interaction.as_ref().map(|json| &json.0)
    }
}
