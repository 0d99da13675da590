//! Brave Search API client.

use async_trait::async_trait;
use serde::Deserialize;

use super::config::SearchConfig;
use super::models::{fallback_results, SearchHit};
use super::protocols::WebSearch;
use crate::errors::SearchError;
use crate::utils::normalize_whitespace;

#[derive(Debug, Default, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Default, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Web search backed by the Brave Search API.
///
/// Without a credential every query is answered with [`fallback_results`].
#[derive(Debug, Clone)]
pub struct BraveSearch {
    client: reqwest::Client,
    config: SearchConfig,
}

impl BraveSearch {
    /// Creates a client from `config`.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl WebSearch for BraveSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::debug!(query, "Brave credential missing, returning fallback results");
            return Ok(fallback_results(query));
        };

        let count = self.config.result_count.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        let hits = parse_results(&body)?;
        tracing::debug!(query, hits = hits.len(), "Brave search completed");
        Ok(hits)
    }

    fn is_configured(&self) -> bool {
        self.config.has_credential()
    }
}

/// Parses a Brave web search response body into hits.
pub(crate) fn parse_results(body: &str) -> Result<Vec<SearchHit>, SearchError> {
    let response: BraveResponse =
        serde_json::from_str(body).map_err(|e| SearchError::MalformedResponse(e.to_string()))?;
    Ok(response
        .web
        .unwrap_or_default()
        .results
        .into_iter()
        .map(|r| SearchHit::new(strip_html(&r.title), r.url, strip_html(&r.description)))
        .collect())
}

/// Removes markup from a snippet, keeping its text.
pub(crate) fn strip_html(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return normalize_whitespace(fragment);
    }
    let html = scraper::Html::parse_fragment(fragment);
    let text: String = html.root_element().text().collect();
    normalize_whitespace(&text)
}
