//! Library item entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{LibraryStatus, MediaKind};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the library table.
#[derive(Debug, Clone, FromRow)]
pub struct LibraryItemEntity {
    pub id: Uuid,
    pub request_id: Uuid,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub media_type: MediaKind,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub requester_phone: String,
    pub requester_nickname: Option<String>,
    pub manager_id: Uuid,
    pub status: LibraryStatus,
    pub added_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub renewal_count: i32,
    pub renewed_at: Option<DateTime<Utc>>,
    pub user_requested_expiry: bool,
    pub user_requested_expiry_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}
