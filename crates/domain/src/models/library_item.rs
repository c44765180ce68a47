//! Library entries: approved requests with a time-limited expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How long a library item lives from approval or its latest renewal.
pub const RENEWAL_PERIOD_DAYS: i64 = 21;

/// Returns the renewal period as a chrono duration.
pub fn renewal_period() -> Duration {
    Duration::days(RENEWAL_PERIOD_DAYS)
}

/// Computes the expiry timestamp for an item added or renewed at `from`.
pub fn expiry_from(from: DateTime<Utc>) -> DateTime<Utc> {
    from + renewal_period()
}

/// Lifecycle status of a library item. Termination is a status change,
/// never a physical delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "library_status", rename_all = "snake_case")]
pub enum LibraryStatus {
    Active,
    /// Removed by the manager from the dashboard.
    Removed,
    /// Deleted by the manager before the user ever saw it expire.
    Deleted,
    /// Force-expired by the user through a DELETE reply.
    ExpiredByUser,
}

/// Dashboard request body for renewing a library item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenewLibraryItemRequest {
    pub item_id: Uuid,
    pub new_expiry_date: DateTime<Utc>,
}

/// Dashboard request body for removing a library item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLibraryItemRequest {
    pub item_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_from_adds_21_days() {
        let added_at = Utc::now();
        let expires_at = expiry_from(added_at);
        assert_eq!(expires_at - added_at, Duration::days(21));
    }

    #[test]
    fn test_library_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LibraryStatus::ExpiredByUser).unwrap(),
            "\"expired_by_user\""
        );
    }

    #[test]
    fn test_renew_request_deserialization() {
        let body: RenewLibraryItemRequest = serde_json::from_str(
            r#"{"itemId": "00000000-0000-0000-0000-000000000001", "newExpiryDate": "2026-09-16T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(body.new_expiry_date.to_rfc3339(), "2026-09-16T00:00:00+00:00");
    }
}
