//! Media request repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::library_item;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::media_request::NewMediaRequest;
use crate::entities::{LibraryItemEntity, MediaRequestEntity};
use crate::metrics::QueryTimer;

const REQUEST_COLUMNS: &str = "id, tmdb_id, title, media_type, overview, poster_path, \
     release_year, rating, requester_id, requester_phone, requester_nickname, manager_id, \
     status, created_at, updated_at, cancelled_at, cancellation_reason";

const LIBRARY_COLUMNS: &str = "id, request_id, tmdb_id, title, media_type, overview, \
     poster_path, release_year, rating, requester_phone, requester_nickname, manager_id, \
     status, added_at, expires_at, renewal_count, renewed_at, user_requested_expiry, \
     user_requested_expiry_at, removed_at";

/// Outcome of an approval attempt.
///
/// Approval is idempotent: re-approving an already-decided request promotes
/// and notifies nothing.
#[derive(Debug, Clone)]
pub enum PromotionResult {
    Promoted {
        request: MediaRequestEntity,
        item: LibraryItemEntity,
    },
    AlreadyDecided(MediaRequestEntity),
    NotFound,
}

/// Outcome of a rejection attempt.
#[derive(Debug, Clone)]
pub enum RejectionResult {
    Rejected(MediaRequestEntity),
    AlreadyDecided(MediaRequestEntity),
    NotFound,
}

/// Repository for media request database operations.
#[derive(Clone)]
pub struct MediaRequestRepository {
    pool: PgPool,
}

impl MediaRequestRepository {
    /// Creates a new MediaRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new pending media request.
    pub async fn create(
        &self,
        request: &NewMediaRequest,
    ) -> Result<MediaRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_media_request");
        let result = sqlx::query_as::<_, MediaRequestEntity>(&format!(
            "INSERT INTO media_requests \
             (tmdb_id, title, media_type, overview, poster_path, release_year, rating, \
              requester_id, requester_phone, requester_nickname, manager_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(request.tmdb_id)
        .bind(&request.title)
        .bind(request.media_type)
        .bind(&request.overview)
        .bind(&request.poster_path)
        .bind(&request.release_year)
        .bind(&request.rating)
        .bind(request.requester_id)
        .bind(&request.requester_phone)
        .bind(&request.requester_nickname)
        .bind(request.manager_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a request by id.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<MediaRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_media_request_by_id");
        let result = sqlx::query_as::<_, MediaRequestEntity>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM media_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All pending requests, oldest first (for the manager reminder).
    pub async fn find_pending(&self) -> Result<Vec<MediaRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_pending_media_requests");
        let result = sqlx::query_as::<_, MediaRequestEntity>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM media_requests \
             WHERE status = 'pending' ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approve a request and promote it into the library in one transaction.
    ///
    /// The status flip is conditional on the request still being pending, and
    /// the library insert only happens when the flip landed, which makes
    /// double-approval harmless. `expires_at` is `now` plus the renewal period.
    pub async fn approve_and_promote(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PromotionResult, sqlx::Error> {
        let timer = QueryTimer::new("approve_and_promote_request");
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query_as::<_, MediaRequestEntity>(&format!(
            "UPDATE media_requests SET status = 'approved', updated_at = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let request = match flipped {
            Some(request) => request,
            None => {
                tx.rollback().await?;
                timer.record();
                return match self.find_by_id(id).await? {
                    Some(existing) => Ok(PromotionResult::AlreadyDecided(existing)),
                    None => Ok(PromotionResult::NotFound),
                };
            }
        };

        let expires_at = library_item::expiry_from(now);
        let item = sqlx::query_as::<_, LibraryItemEntity>(&format!(
            "INSERT INTO library \
             (request_id, tmdb_id, title, media_type, overview, poster_path, release_year, \
              rating, requester_phone, requester_nickname, manager_id, added_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {LIBRARY_COLUMNS}"
        ))
        .bind(request.id)
        .bind(request.tmdb_id)
        .bind(&request.title)
        .bind(request.media_type)
        .bind(&request.overview)
        .bind(&request.poster_path)
        .bind(&request.release_year)
        .bind(&request.rating)
        .bind(&request.requester_phone)
        .bind(&request.requester_nickname)
        .bind(request.manager_id)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(PromotionResult::Promoted { request, item })
    }

    /// Reject a request. Idempotent against an already-decided request.
    pub async fn reject(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RejectionResult, sqlx::Error> {
        let timer = QueryTimer::new("reject_request");
        let flipped = sqlx::query_as::<_, MediaRequestEntity>(&format!(
            "UPDATE media_requests SET status = 'rejected', updated_at = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match flipped {
            Some(request) => Ok(RejectionResult::Rejected(request)),
            None => match self.find_by_id(id).await? {
                Some(existing) => Ok(RejectionResult::AlreadyDecided(existing)),
                None => Ok(RejectionResult::NotFound),
            },
        }
    }
}
