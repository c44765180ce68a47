//! Media request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::media_request::CancellationReason;
use domain::models::{MediaKind, RequestStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the media_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct MediaRequestEntity {
    pub id: Uuid,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub media_type: MediaKind,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub requester_id: Uuid,
    pub requester_phone: String,
    pub requester_nickname: Option<String>,
    pub manager_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<CancellationReason>,
}

/// Column projection for creating a media request.
#[derive(Debug, Clone)]
pub struct NewMediaRequest {
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub media_type: MediaKind,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub requester_id: Uuid,
    pub requester_phone: String,
    pub requester_nickname: Option<String>,
    pub manager_id: Uuid,
}
