//! Expiry notices: the durable record of a numbered expiry SMS.
//!
//! The ordered `item_order` list IS the addressing contract for later
//! "RENEW n" / "DELETE n" replies: index n refers to `item_order[n-1]` of the
//! requester's most recent pending notice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Items expiring within this many days are picked up by the scanner.
pub const EXPIRY_WARNING_DAYS: i64 = 3;

/// Overall status of a notice.
///
/// Notices are never auto-closed when their items resolve; a newer scan for
/// the same requester supersedes the prior pending notice instead, so the
/// most-recent-pending lookup cannot return a stale batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notice_status", rename_all = "snake_case")]
pub enum NoticeStatus {
    Pending,
    Superseded,
}

/// Per-item outcome recorded in place on the notice's ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeItemStatus {
    Pending,
    Renewed,
    Deleted,
    /// The referenced library item could not be resolved anymore.
    Unavailable,
    ExpiredByUser,
}

/// One entry of a notice's ordered item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeItem {
    pub library_item_id: Uuid,
    pub title: String,
    pub expires_at: DateTime<Utc>,
    pub status: NoticeItemStatus,
}

/// Per-item renewal outcome, keyed by library item id on the notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalRecord {
    pub renewed_at: DateTime<Utc>,
    pub new_expiry_date: DateTime<Utc>,
}

/// Per-item deletion outcome, keyed by library item id on the notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRecord {
    pub deleted_at: DateTime<Utc>,
}

/// Error recorded on the notice when an item could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeErrorRecord {
    pub item_id: Uuid,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

/// Whole days until expiry, rounded up: an item expiring in 30 hours has
/// "2 days left". Minimum 1 for any future timestamp picked up by the scan.
pub fn days_until_expiry(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> i64 {
    let secs = (expires_at - now).num_seconds();
    (secs + 86_400 - 1).div_euclid(86_400)
}

/// "1 day" / "n days" wording for SMS bodies.
pub fn format_day_count(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_days_until_expiry_rounds_up() {
        let now = Utc::now();
        assert_eq!(days_until_expiry(now, now + Duration::hours(30)), 2);
        assert_eq!(days_until_expiry(now, now + Duration::hours(24)), 1);
        assert_eq!(days_until_expiry(now, now + Duration::hours(1)), 1);
        assert_eq!(days_until_expiry(now, now + Duration::hours(72)), 3);
    }

    #[test]
    fn test_days_until_expiry_exact_boundary() {
        let now = Utc::now();
        assert_eq!(
            days_until_expiry(now, now + Duration::days(2) + Duration::seconds(1)),
            3
        );
    }

    #[test]
    fn test_format_day_count() {
        assert_eq!(format_day_count(1), "1 day");
        assert_eq!(format_day_count(2), "2 days");
        assert_eq!(format_day_count(3), "3 days");
    }

    #[test]
    fn test_notice_item_serialization() {
        let item = NoticeItem {
            library_item_id: Uuid::nil(),
            title: "Inception".to_string(),
            expires_at: Utc::now(),
            status: NoticeItemStatus::Pending,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"libraryItemId\""));
        assert!(json.contains("\"status\":\"pending\""));

        let back: NoticeItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_notice_item_status_expired_by_user() {
        assert_eq!(
            serde_json::to_string(&NoticeItemStatus::ExpiredByUser).unwrap(),
            "\"expired_by_user\""
        );
    }
}
