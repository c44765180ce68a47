//! Media catalog search abstraction.
//!
//! The core only depends on this contract: free-text query in, ranked
//! candidate list out. The TMDB-backed implementation lives in the API crate.

use crate::models::media::CatalogItem;

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(String),

    #[error("Catalog returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// Catalog search collaborator.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Search the catalog. Returns at most 5 normalized candidates; an empty
    /// list means no matches.
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Mock catalog for development and testing.
///
/// Returns a fixed result list, or fails when configured to.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    pub results: Vec<CatalogItem>,
    pub simulate_failure: bool,
}

impl MockCatalog {
    /// Create a mock returning the given candidates.
    pub fn with_results(results: Vec<CatalogItem>) -> Self {
        Self {
            results,
            simulate_failure: false,
        }
    }

    /// Create a mock returning no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a mock that simulates failures.
    pub fn failing() -> Self {
        Self {
            results: Vec::new(),
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        if self.simulate_failure {
            tracing::warn!(query = %query, "Mock catalog simulating failure");
            return Err(CatalogError::Http("Simulated failure".to_string()));
        }

        tracing::info!(
            query = %query,
            result_count = self.results.len(),
            "Mock catalog search"
        );

        Ok(self.results.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaKind;

    #[tokio::test]
    async fn test_mock_catalog_returns_results() {
        let catalog = MockCatalog::with_results(vec![CatalogItem {
            tmdb_id: 27205,
            title: "Inception".to_string(),
            media_type: MediaKind::Movie,
            overview: "A thief.".to_string(),
            release_year: Some("2010".to_string()),
            rating: Some("8.4".to_string()),
            poster_path: None,
        }]);

        let results = catalog.search("inception").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Inception");
    }

    #[tokio::test]
    async fn test_mock_catalog_empty() {
        let catalog = MockCatalog::empty();
        assert!(catalog.search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_catalog_failure() {
        let catalog = MockCatalog::failing();
        assert!(catalog.search("anything").await.is_err());
    }
}
