//! TMDB-backed catalog client.

use async_trait::async_trait;
use domain::models::{CatalogItem, MediaKind};
use domain::services::{Catalog, CatalogError};
use serde::Deserialize;

use crate::config::TmdbConfig;

const MAX_RESULTS: usize = 5;
const MAX_OVERVIEW_CHARS: usize = 150;

/// Catalog implementation backed by the TMDB multi-search endpoint.
pub struct TmdbCatalog {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbCatalog {
    pub fn new(config: &TmdbConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Catalog for TmdbCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = format!("{}/search/multi", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Http(format!(
                "TMDB returned status {}",
                response.status()
            )));
        }

        let body: TmdbSearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        Ok(normalize_results(body.results))
    }
}

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbResult>,
}

/// One raw entry of a multi-search response. People and other non-media
/// entries are filtered out during normalization.
#[derive(Debug, Deserialize)]
struct TmdbResult {
    id: i64,
    media_type: String,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    poster_path: Option<String>,
}

/// Normalize raw search results into at most 5 display-ready candidates.
fn normalize_results(results: Vec<TmdbResult>) -> Vec<CatalogItem> {
    results
        .into_iter()
        .filter_map(normalize_result)
        .take(MAX_RESULTS)
        .collect()
}

fn normalize_result(result: TmdbResult) -> Option<CatalogItem> {
    let (media_type, title, date) = match result.media_type.as_str() {
        "movie" => (MediaKind::Movie, result.title?, result.release_date),
        "tv" => (MediaKind::Tv, result.name?, result.first_air_date),
        _ => return None,
    };

    let overview = match result.overview {
        Some(text) if !text.is_empty() => text.chars().take(MAX_OVERVIEW_CHARS).collect(),
        _ => "No description available.".to_string(),
    };

    let release_year = date
        .filter(|d| d.len() >= 4)
        .map(|d| d.chars().take(4).collect());

    // A zero vote average means "unrated"
    let rating = result
        .vote_average
        .filter(|&avg| avg > 0.0)
        .map(|avg| format!("{:.1}", avg));

    Some(CatalogItem {
        tmdb_id: result.id,
        title,
        media_type,
        overview,
        release_year,
        rating,
        poster_path: result.poster_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str) -> TmdbResult {
        TmdbResult {
            id,
            media_type: "movie".to_string(),
            title: Some(title.to_string()),
            name: None,
            overview: Some("A heist inside dreams.".to_string()),
            release_date: Some("2010-07-16".to_string()),
            first_air_date: None,
            vote_average: Some(8.36),
            poster_path: Some("/poster.jpg".to_string()),
        }
    }

    #[test]
    fn test_normalize_maps_movie_fields() {
        let items = normalize_results(vec![movie(27205, "Inception")]);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.tmdb_id, 27205);
        assert_eq!(item.title, "Inception");
        assert_eq!(item.media_type, MediaKind::Movie);
        assert_eq!(item.release_year.as_deref(), Some("2010"));
        assert_eq!(item.rating.as_deref(), Some("8.4"));
        assert_eq!(item.poster_path.as_deref(), Some("/poster.jpg"));
    }

    #[test]
    fn test_normalize_tv_uses_name_and_first_air_date() {
        let result = TmdbResult {
            id: 1399,
            media_type: "tv".to_string(),
            title: None,
            name: Some("Game of Thrones".to_string()),
            overview: Some("Seven noble families.".to_string()),
            release_date: None,
            first_air_date: Some("2011-04-17".to_string()),
            vote_average: Some(8.4),
            poster_path: None,
        };

        let items = normalize_results(vec![result]);
        assert_eq!(items[0].title, "Game of Thrones");
        assert_eq!(items[0].media_type, MediaKind::Tv);
        assert_eq!(items[0].release_year.as_deref(), Some("2011"));
    }

    #[test]
    fn test_normalize_filters_people_and_caps_at_five() {
        let mut results: Vec<TmdbResult> = (0..8).map(|i| movie(i, "Movie")).collect();
        results.insert(
            0,
            TmdbResult {
                id: 99,
                media_type: "person".to_string(),
                title: None,
                name: Some("Christopher Nolan".to_string()),
                overview: None,
                release_date: None,
                first_air_date: None,
                vote_average: None,
                poster_path: None,
            },
        );

        let items = normalize_results(results);
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.media_type == MediaKind::Movie));
    }

    #[test]
    fn test_normalize_truncates_long_overview() {
        let mut result = movie(1, "Long");
        result.overview = Some("x".repeat(400));
        let items = normalize_results(vec![result]);
        assert_eq!(items[0].overview.chars().count(), 150);
    }

    #[test]
    fn test_normalize_missing_overview_gets_fallback() {
        let mut result = movie(1, "Silent");
        result.overview = None;
        let items = normalize_results(vec![result]);
        assert_eq!(items[0].overview, "No description available.");
    }

    #[test]
    fn test_normalize_zero_rating_is_omitted() {
        let mut result = movie(1, "Unrated");
        result.vote_average = Some(0.0);
        let items = normalize_results(vec![result]);
        assert!(items[0].rating.is_none());
    }
}
