//! Configuration for the web search collaborator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a web search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API credential. Without one the client answers with fallback results.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Number of results to request.
    #[serde(default = "default_result_count")]
    pub result_count: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "https://api.search.brave.com/res/v1/web/search".to_string()
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT.as_secs_f64()
}

fn default_result_count() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("autoblog/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: default_timeout(),
            result_count: default_result_count(),
            user_agent: default_user_agent(),
        }
    }
}

impl SearchConfig {
    /// Creates a search configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Whether a credential is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Gets timeout as Duration.
    ///
    /// Values that are not a positive, representable number of seconds fall
    /// back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert!(config.endpoint.contains("brave.com"));
        assert!(!config.has_credential());
        assert_eq!(config.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_unusable_timeout_falls_back_to_default() {
        for seconds in [1e30, f64::INFINITY, f64::NAN, -3.0, 0.0] {
            assert_eq!(SearchConfig::new().with_timeout(seconds).timeout(), DEFAULT_TIMEOUT);
        }
        assert_eq!(
            SearchConfig::new().with_timeout(2.5).timeout(),
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn test_blank_key_is_no_key() {
        let config = SearchConfig::new().with_api_key(Some("  ".to_string()));
        assert!(!config.has_credential());
        let config = SearchConfig::new().with_api_key(Some("secret".to_string()));
        assert!(config.has_credential());
    }

    #[test]
    fn test_key_never_serialized() {
        let config = SearchConfig::new().with_api_key(Some("secret".to_string()));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SearchConfig = serde_json::from_str(r#"{"result_count": 3}"#).unwrap();
        assert_eq!(config.result_count, 3);
        assert_eq!(config.timeout_seconds, 15.0);
    }
}
