//! Search result model and the credential-less fallback set.

use serde::{Deserialize, Serialize};

/// URL used by the fallback result.
pub const FALLBACK_URL: &str = "https://example.com";

/// Snippet used by the fallback result.
pub const FALLBACK_DESCRIPTION: &str = "This is a dummy result because no API key was provided";

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Text snippet describing the result.
    #[serde(default, alias = "description")]
    pub snippet: String,
}

impl SearchHit {
    /// Creates a search hit.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    /// Returns the host of the hit's URL, without a `www.` prefix.
    #[must_use]
    pub fn domain(&self) -> Option<String> {
        extract_domain(&self.url)
    }
}

/// The fixed result set returned when no search credential is configured.
#[must_use]
pub fn fallback_results(query: &str) -> Vec<SearchHit> {
    vec![SearchHit::new(
        format!("Dummy result for {query}"),
        FALLBACK_URL,
        FALLBACK_DESCRIPTION,
    )]
}

/// Extracts the lowercase host from a URL, dropping `www.`, userinfo and port.
#[must_use]
pub fn extract_domain(url: &str) -> Option<String> {
    let start = url.find("://").map(|i| i + 3)?;
    let rest = &url[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host).to_lowercase();
    let host = host.strip_prefix("www.").map(String::from).unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let results = fallback_results("AI in Healthcare AI, healthcare");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Dummy result for AI in Healthcare AI, healthcare");
        assert_eq!(results[0].url, FALLBACK_URL);
        assert_eq!(results[0].snippet, FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_snippet_accepts_description_alias() {
        let hit: SearchHit = serde_json::from_value(serde_json::json!({
            "title": "t",
            "url": "https://example.com",
            "description": "d"
        }))
        .unwrap();
        assert_eq!(hit.snippet, "d");
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.Example.com/path?q=1"), Some("example.com".to_string()));
        assert_eq!(extract_domain("http://user@news.site.org:8080"), Some("news.site.org".to_string()));
        assert_eq!(extract_domain("https://blog.io#frag"), Some("blog.io".to_string()));
        assert_eq!(extract_domain("not a url"), None);
        assert_eq!(extract_domain("https:///nohost"), None);
    }
}
