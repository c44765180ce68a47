//! Pending invitations awaiting a "YES" confirmation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "invitation_status", rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Dashboard request body for inviting a phone number.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationRequest {
    #[validate(custom(function = "shared::validation::validate_phone_number"))]
    pub phone_number: String,

    pub manager_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_nickname"))]
    pub nickname: Option<String>,
}

/// Response body after creating an invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationResponse {
    pub id: Uuid,
    pub phone_number: String,
    pub sms_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_invitation_request_valid() {
        let request: CreateInvitationRequest = serde_json::from_str(
            r#"{"phoneNumber": "(555) 123-4567", "managerId": "00000000-0000-0000-0000-000000000001", "nickname": "Alex"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_invitation_request_bad_phone() {
        let request: CreateInvitationRequest = serde_json::from_str(
            r#"{"phoneNumber": "12345", "managerId": "00000000-0000-0000-0000-000000000001"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_invitation_request_nickname_optional() {
        let request: CreateInvitationRequest = serde_json::from_str(
            r#"{"phoneNumber": "5551234567", "managerId": "00000000-0000-0000-0000-000000000001"}"#,
        )
        .unwrap();
        assert!(request.nickname.is_none());
        assert!(request.validate().is_ok());
    }
}
