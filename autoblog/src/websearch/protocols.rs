//! The web search capability.

use async_trait::async_trait;

use super::models::{fallback_results, SearchHit};
use crate::errors::SearchError;

/// Capability: run a web search query.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Searches the web for `query`.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Whether a credential is configured for a real search backend.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Search collaborator used when no search credential is configured.
///
/// Always answers with [`fallback_results`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSearch;

#[async_trait]
impl WebSearch for FallbackSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        tracing::debug!(query, "No search credential configured, returning fallback results");
        Ok(fallback_results(query))
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_search() {
        let search = FallbackSearch;
        let hits = search.search("rust pipelines").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Dummy result for rust pipelines");
        assert!(!search.is_configured());
    }
}
