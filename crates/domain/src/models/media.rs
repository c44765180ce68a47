//! Media kinds and catalog search candidates.

use serde::{Deserialize, Serialize};

/// Kind of media a request refers to.
///
/// `Custom` covers free-text requests for titles the catalog could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "media_kind", rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Custom,
}

impl MediaKind {
    /// Human-readable label used in SMS replies.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Tv => "TV Show",
            MediaKind::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Tv => write!(f, "tv"),
            MediaKind::Custom => write!(f, "custom"),
        }
    }
}

/// One ranked candidate returned by the media catalog, already normalized
/// for storage and SMS display (overview truncated, rating to one decimal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub tmdb_id: i64,
    pub title: String,
    pub media_type: MediaKind,
    pub overview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_label() {
        assert_eq!(MediaKind::Movie.label(), "Movie");
        assert_eq!(MediaKind::Tv.label(), "TV Show");
        assert_eq!(MediaKind::Custom.label(), "Custom");
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Movie.to_string(), "movie");
        assert_eq!(MediaKind::Tv.to_string(), "tv");
    }

    #[test]
    fn test_catalog_item_serialization_omits_empty_optionals() {
        let item = CatalogItem {
            tmdb_id: 27205,
            title: "Inception".to_string(),
            media_type: MediaKind::Movie,
            overview: "A thief who steals corporate secrets.".to_string(),
            release_year: Some("2010".to_string()),
            rating: None,
            poster_path: None,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"tmdbId\":27205"));
        assert!(json.contains("\"mediaType\":\"movie\""));
        assert!(json.contains("\"releaseYear\":\"2010\""));
        assert!(!json.contains("rating"));
        assert!(!json.contains("posterPath"));
    }

    #[test]
    fn test_catalog_item_round_trip() {
        let item = CatalogItem {
            tmdb_id: 1399,
            title: "Game of Thrones".to_string(),
            media_type: MediaKind::Tv,
            overview: "Seven noble families.".to_string(),
            release_year: Some("2011".to_string()),
            rating: Some("8.4".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
