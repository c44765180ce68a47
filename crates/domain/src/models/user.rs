//! Registered users (requesters) and their single-slot conversation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::media::CatalogItem;

/// Lifecycle status of a requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
pub enum UserStatus {
    Pending,
    Active,
    Deregistered,
    /// Removed by their manager from the dashboard.
    Inactive,
}

/// What the user's next numeric reply means.
///
/// At most one interaction is pending per user; a new search or custom
/// request overwrites any prior one, and consuming it clears the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PendingInteraction {
    /// A numbered search result list awaiting a 1-based pick.
    #[serde(rename_all = "camelCase")]
    SearchResults {
        results: Vec<CatalogItem>,
        original_query: String,
        timestamp: DateTime<Utc>,
    },
    /// A custom-request title awaiting a submit (1) / retry (2) choice.
    #[serde(rename_all = "camelCase")]
    CustomRequest {
        title: String,
        original_query: String,
        timestamp: DateTime<Utc>,
    },
}

/// Dashboard request body for removing a user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUserRequest {
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaKind;

    fn candidate(title: &str) -> CatalogItem {
        CatalogItem {
            tmdb_id: 1,
            title: title.to_string(),
            media_type: MediaKind::Movie,
            overview: "overview".to_string(),
            release_year: None,
            rating: None,
            poster_path: None,
        }
    }

    #[test]
    fn test_pending_interaction_search_results_tagged() {
        let interaction = PendingInteraction::SearchResults {
            results: vec![candidate("Inception")],
            original_query: "inception".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&interaction).unwrap();
        assert!(json.contains("\"kind\":\"searchResults\""));
        assert!(json.contains("\"originalQuery\":\"inception\""));
    }

    #[test]
    fn test_pending_interaction_custom_request_tagged() {
        let interaction = PendingInteraction::CustomRequest {
            title: "Obscure Documentary".to_string(),
            original_query: "Obscure Documentary".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&interaction).unwrap();
        assert!(json.contains("\"kind\":\"customRequest\""));

        let back: PendingInteraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, interaction);
    }

    #[test]
    fn test_user_status_serialization() {
        assert_eq!(
            serde_json::to_string(&UserStatus::Deregistered).unwrap(),
            "\"deregistered\""
        );
    }
}
