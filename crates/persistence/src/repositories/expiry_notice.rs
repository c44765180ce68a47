//! Expiry notice repository for database operations.
//!
//! The notice's `item_order` JSONB column is mutated in place with guarded
//! updates: an entry only transitions out of `pending` once, so a double
//! "RENEW 1" cannot renew twice.

use chrono::{DateTime, Utc};
use domain::models::expiry_notice::{DeletionRecord, NoticeErrorRecord, RenewalRecord};
use domain::models::NoticeItem;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ExpiryNoticeEntity;
use crate::metrics::QueryTimer;

const NOTICE_COLUMNS: &str =
    "id, requester_phone, status, sent_at, item_order, renewals, deletions, errors";

/// Repository for expiry notice database operations.
#[derive(Clone)]
pub struct ExpiryNoticeRepository {
    pool: PgPool,
}

impl ExpiryNoticeRepository {
    /// Creates a new ExpiryNoticeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending notice for a requester, superseding any prior pending
    /// notices for the same phone in the same transaction so the most-recent
    /// lookup can never land on a stale batch.
    pub async fn create_superseding(
        &self,
        requester_phone: &str,
        sent_at: DateTime<Utc>,
        items: &[NoticeItem],
    ) -> Result<ExpiryNoticeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_expiry_notice");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE expiry_notifications SET status = 'superseded' \
             WHERE requester_phone = $1 AND status = 'pending'",
        )
        .bind(requester_phone)
        .execute(&mut *tx)
        .await?;

        let notice = sqlx::query_as::<_, ExpiryNoticeEntity>(&format!(
            "INSERT INTO expiry_notifications (requester_phone, sent_at, item_order) \
             VALUES ($1, $2, $3) \
             RETURNING {NOTICE_COLUMNS}"
        ))
        .bind(requester_phone)
        .bind(sent_at)
        .bind(Json(items))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(notice)
    }

    /// The requester's most recent pending notice, deterministically ordered
    /// by sent_at then id.
    pub async fn find_latest_pending(
        &self,
        requester_phone: &str,
    ) -> Result<Option<ExpiryNoticeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_latest_pending_notice");
        let result = sqlx::query_as::<_, ExpiryNoticeEntity>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM expiry_notifications \
             WHERE requester_phone = $1 AND status = 'pending' \
             ORDER BY sent_at DESC, id DESC LIMIT 1"
        ))
        .bind(requester_phone)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Renew the library item addressed by a notice entry.
    ///
    /// Flips the entry to `renewed` (guarded on it being pending), records
    /// the renewal in the side map, and extends the library item, all in one
    /// transaction. Returns false without mutating anything when the entry
    /// was already resolved or the item is no longer active.
    pub async fn apply_renewal(
        &self,
        notice_id: Uuid,
        item_index: usize,
        item_id: Uuid,
        now: DateTime<Utc>,
        new_expiry: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("apply_notice_renewal");
        let mut tx = self.pool.begin().await?;

        let record = RenewalRecord {
            renewed_at: now,
            new_expiry_date: new_expiry,
        };
        let notice_updated = sqlx::query(
            "UPDATE expiry_notifications \
             SET item_order = jsonb_set(item_order, ARRAY[$2::text, 'status'], '\"renewed\"'), \
                 renewals = jsonb_set(renewals, ARRAY[$3::text], $4) \
             WHERE id = $1 AND item_order->($2::int)->>'status' = 'pending'",
        )
        .bind(notice_id)
        .bind(item_index as i32)
        .bind(item_id.to_string())
        .bind(Json(&record))
        .execute(&mut *tx)
        .await?;

        if notice_updated.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        let item_updated = sqlx::query(
            "UPDATE library \
             SET expires_at = $2, renewed_at = $3, renewal_count = renewal_count + 1 \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(item_id)
        .bind(new_expiry)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if item_updated.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        tx.commit().await?;
        timer.record();
        Ok(true)
    }

    /// Force-expire the library item addressed by a notice entry.
    ///
    /// Flips the entry to `expired_by_user` (guarded on it being pending),
    /// records the deletion in the side map, and backdates the item's expiry
    /// instead of hard-deleting it.
    pub async fn apply_deletion(
        &self,
        notice_id: Uuid,
        item_index: usize,
        item_id: Uuid,
        now: DateTime<Utc>,
        forced_expiry: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("apply_notice_deletion");
        let mut tx = self.pool.begin().await?;

        let record = DeletionRecord { deleted_at: now };
        let notice_updated = sqlx::query(
            "UPDATE expiry_notifications \
             SET item_order = jsonb_set(item_order, ARRAY[$2::text, 'status'], '\"expired_by_user\"'), \
                 deletions = jsonb_set(deletions, ARRAY[$3::text], $4) \
             WHERE id = $1 AND item_order->($2::int)->>'status' = 'pending'",
        )
        .bind(notice_id)
        .bind(item_index as i32)
        .bind(item_id.to_string())
        .bind(Json(&record))
        .execute(&mut *tx)
        .await?;

        if notice_updated.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        let item_updated = sqlx::query(
            "UPDATE library \
             SET expires_at = $2, status = 'expired_by_user', \
                 user_requested_expiry = true, user_requested_expiry_at = $3 \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(item_id)
        .bind(forced_expiry)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if item_updated.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(false);
        }

        tx.commit().await?;
        timer.record();
        Ok(true)
    }

    /// Mark a notice entry unavailable and record the resolution failure.
    pub async fn mark_item_unavailable(
        &self,
        notice_id: Uuid,
        item_index: usize,
        item_id: Uuid,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_notice_item_unavailable");
        let error = NoticeErrorRecord {
            item_id,
            message: message.to_string(),
            recorded_at: now,
        };
        sqlx::query(
            "UPDATE expiry_notifications \
             SET item_order = jsonb_set(item_order, ARRAY[$2::text, 'status'], '\"unavailable\"'), \
                 errors = errors || $3 \
             WHERE id = $1",
        )
        .bind(notice_id)
        .bind(item_index as i32)
        .bind(Json(&error))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}
