//! Manager-facing notification records shown on the dashboard.

use serde::{Deserialize, Serialize};

/// What a dashboard notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
pub enum NotificationType {
    UserDeregistered,
    UserRemoved,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::UserDeregistered => write!(f, "user_deregistered"),
            NotificationType::UserRemoved => write!(f, "user_removed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_display() {
        assert_eq!(
            NotificationType::UserDeregistered.to_string(),
            "user_deregistered"
        );
        assert_eq!(NotificationType::UserRemoved.to_string(), "user_removed");
    }
}
