//! Library repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::LibraryItemEntity;
use crate::metrics::QueryTimer;

const LIBRARY_COLUMNS: &str = "id, request_id, tmdb_id, title, media_type, overview, \
     poster_path, release_year, rating, requester_phone, requester_nickname, manager_id, \
     status, added_at, expires_at, renewal_count, renewed_at, user_requested_expiry, \
     user_requested_expiry_at, removed_at";

/// Repository for library item database operations.
#[derive(Clone)]
pub struct LibraryRepository {
    pool: PgPool,
}

impl LibraryRepository {
    /// Creates a new LibraryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a library item by id.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<LibraryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_library_item_by_id");
        let result = sqlx::query_as::<_, LibraryItemEntity>(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM library WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active items expiring in the window (from, to], ordered so grouping by
    /// requester and building the per-requester item order is deterministic.
    pub async fn find_expiring_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LibraryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_expiring_library_items");
        let result = sqlx::query_as::<_, LibraryItemEntity>(&format!(
            "SELECT {LIBRARY_COLUMNS} FROM library \
             WHERE status = 'active' AND expires_at > $1 AND expires_at <= $2 \
             ORDER BY requester_phone ASC, expires_at ASC, id ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Manager-side renewal: set the expiry to an explicit date and count the
    /// renewal. Only active items can be renewed.
    pub async fn set_expiry(
        &self,
        id: Uuid,
        new_expiry: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<LibraryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_library_item_expiry");
        let result = sqlx::query_as::<_, LibraryItemEntity>(&format!(
            "UPDATE library \
             SET expires_at = $2, renewed_at = $3, renewal_count = renewal_count + 1 \
             WHERE id = $1 AND status = 'active' \
             RETURNING {LIBRARY_COLUMNS}"
        ))
        .bind(id)
        .bind(new_expiry)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Manager-side removal: flip the item out of the library.
    pub async fn mark_removed(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<LibraryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_library_item_removed");
        let result = sqlx::query_as::<_, LibraryItemEntity>(&format!(
            "UPDATE library SET status = 'removed', removed_at = $2 \
             WHERE id = $1 AND status = 'active' \
             RETURNING {LIBRARY_COLUMNS}"
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
