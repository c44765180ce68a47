//! Media requests submitted over SMS and reviewed from the dashboard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a media request. Requests are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Expired,
}

/// Why a request was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "cancellation_reason", rename_all = "snake_case")]
pub enum CancellationReason {
    UserDeregistered,
    RemovedByManager,
}

/// Manager decision on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Approved,
    Rejected,
}

/// Dashboard request body for acting on requests.
///
/// Single decisions carry `request_id` + `action`; batch approvals carry
/// `request_ids` + `is_batch_approval: true`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestActionBody {
    pub request_id: Option<Uuid>,
    pub action: Option<RequestAction>,
    #[serde(default)]
    pub request_ids: Vec<Uuid>,
    #[serde(default)]
    pub is_batch_approval: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_action_deserialization() {
        let body: RequestActionBody = serde_json::from_str(
            r#"{"requestId": "00000000-0000-0000-0000-000000000001", "action": "approved"}"#,
        )
        .unwrap();
        assert_eq!(body.action, Some(RequestAction::Approved));
        assert!(!body.is_batch_approval);
        assert!(body.request_ids.is_empty());
    }

    #[test]
    fn test_batch_approval_deserialization() {
        let body: RequestActionBody = serde_json::from_str(
            r#"{"requestIds": ["00000000-0000-0000-0000-000000000001"], "isBatchApproval": true}"#,
        )
        .unwrap();
        assert!(body.is_batch_approval);
        assert_eq!(body.request_ids.len(), 1);
        assert!(body.request_id.is_none());
    }

    #[test]
    fn test_cancellation_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&CancellationReason::UserDeregistered).unwrap(),
            "\"user_deregistered\""
        );
    }
}
