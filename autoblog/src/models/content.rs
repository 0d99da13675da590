//! Final content and the SEO requirements it is scored against.

use serde::{Deserialize, Serialize};

/// SEO specifications for the finalize stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoRequirements {
    /// Keywords the content must cover. Empty means "use the brief's keywords".
    #[serde(default)]
    pub target_keywords: Vec<String>,
    /// Target share of words that are keyword mentions, e.g. `0.01` for 1%.
    #[serde(default = "default_keyword_density")]
    pub target_keyword_density: f64,
    /// Minimum number of headings.
    #[serde(default = "default_min_headings")]
    pub min_headings: usize,
    /// Minimum number of words.
    #[serde(default = "default_min_word_count")]
    pub min_word_count: usize,
    /// Maximum meta description length, in characters.
    #[serde(default = "default_meta_description_max")]
    pub meta_description_max: usize,
}

fn default_keyword_density() -> f64 {
    0.01
}

fn default_min_headings() -> usize {
    3
}

fn default_min_word_count() -> usize {
    300
}

fn default_meta_description_max() -> usize {
    160
}

impl Default for SeoRequirements {
    fn default() -> Self {
        Self {
            target_keywords: Vec::new(),
            target_keyword_density: default_keyword_density(),
            min_headings: default_min_headings(),
            min_word_count: default_min_word_count(),
            meta_description_max: default_meta_description_max(),
        }
    }
}

impl SeoRequirements {
    /// Creates requirements with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.target_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the minimum heading count.
    #[must_use]
    pub fn with_min_headings(mut self, min_headings: usize) -> Self {
        self.min_headings = min_headings;
        self
    }

    /// Sets the minimum word count.
    #[must_use]
    pub fn with_min_word_count(mut self, min_word_count: usize) -> Self {
        self.min_word_count = min_word_count;
        self
    }

    /// Sets the meta description bound.
    #[must_use]
    pub fn with_meta_description_max(mut self, max: usize) -> Self {
        self.meta_description_max = max;
        self
    }
}

/// The terminal artifact handed to the sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalContent {
    /// Final title.
    pub title: String,
    /// Final body (Markdown).
    pub content: String,
    /// SEO meta description, at most `meta_description_max` characters.
    pub meta_description: String,
    /// Headings derived from the content, in order.
    pub headings: Vec<String>,
    /// Word count of `content`.
    pub word_count: usize,
    /// Deterministic SEO score in `[0.0, 1.0]`.
    pub seo_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seo_defaults() {
        let seo = SeoRequirements::default();
        assert_eq!(seo.meta_description_max, 160);
        assert_eq!(seo.min_headings, 3);
        assert!(seo.target_keywords.is_empty());
    }

    #[test]
    fn test_seo_defaults_from_partial_json() {
        let seo: SeoRequirements =
            serde_json::from_value(serde_json::json!({"target_keywords": ["AI"], "min_headings": 1}))
                .unwrap();
        assert_eq!(seo.target_keywords, vec!["AI".to_string()]);
        assert_eq!(seo.min_headings, 1);
        assert_eq!(seo.min_word_count, 300);
    }

    #[test]
    fn test_seo_builder() {
        let seo = SeoRequirements::new()
            .with_keywords(["AI", "healthcare"])
            .with_min_headings(2)
            .with_min_word_count(100)
            .with_meta_description_max(120);
        assert_eq!(seo.target_keywords.len(), 2);
        assert_eq!(seo.min_headings, 2);
        assert_eq!(seo.min_word_count, 100);
        assert_eq!(seo.meta_description_max, 120);
    }
}
