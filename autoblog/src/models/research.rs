//! Research stage output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::websearch::SearchHit;

/// Keyword research data attached to a research result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// The keyword the content must target.
    pub primary_keyword: String,
    /// Remaining keywords, in request order.
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    /// Case-insensitive mentions of each keyword across search titles and snippets.
    #[serde(default)]
    pub mentions: BTreeMap<String, usize>,
    /// Monthly search volume, when a keyword data source provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_volume: Option<u64>,
    /// Competition level, when a keyword data source provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<String>,
}

/// Competitor research data attached to a research result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    /// Domains already ranking for the query, in result order.
    #[serde(default)]
    pub top_competitors: Vec<String>,
    /// Topics the ranking content does not cover.
    #[serde(default)]
    pub content_gaps: Vec<String>,
    /// Angles worth taking.
    #[serde(default)]
    pub opportunities: Vec<String>,
}

/// Findings produced by the research stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    /// The researched topic.
    pub topic: String,
    /// Source URLs used, deduplicated and capped.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Key findings synthesized by the completion provider.
    pub key_points: Vec<String>,
    /// Keyword research data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_analysis: Option<KeywordAnalysis>,
    /// Competitor research data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_analysis: Option<CompetitorAnalysis>,
    /// The raw search results the synthesis was based on.
    #[serde(default)]
    pub search_results: Vec<SearchHit>,
    /// True when the search collaborator failed and fallback results were used.
    #[serde(default)]
    pub search_degraded: bool,
}

impl ResearchResult {
    /// Returns the primary keyword, when keyword analysis ran.
    #[must_use]
    pub fn primary_keyword(&self) -> Option<&str> {
        self.keyword_analysis
            .as_ref()
            .map(|k| k.primary_keyword.as_str())
            .filter(|k| !k.is_empty())
    }

    /// Returns all analyzed keywords, primary first.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        self.keyword_analysis
            .as_ref()
            .map(|k| {
                std::iter::once(k.primary_keyword.clone())
                    .chain(k.secondary_keywords.iter().cloned())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_keywords(primary: &str, secondary: &[&str]) -> ResearchResult {
        ResearchResult {
            topic: "AI in Healthcare".to_string(),
            sources: Vec::new(),
            key_points: vec!["AI assists radiologists".to_string()],
            keyword_analysis: Some(KeywordAnalysis {
                primary_keyword: primary.to_string(),
                secondary_keywords: secondary.iter().map(|s| (*s).to_string()).collect(),
                ..Default::default()
            }),
            competitor_analysis: None,
            search_results: Vec::new(),
            search_degraded: false,
        }
    }

    #[test]
    fn test_primary_keyword() {
        let result = result_with_keywords("AI", &["healthcare"]);
        assert_eq!(result.primary_keyword(), Some("AI"));
        assert_eq!(result.keywords(), vec!["AI".to_string(), "healthcare".to_string()]);
    }

    #[test]
    fn test_primary_keyword_absent() {
        let mut result = result_with_keywords("", &[]);
        assert_eq!(result.primary_keyword(), None);
        result.keyword_analysis = None;
        assert!(result.keywords().is_empty());
    }

    #[test]
    fn test_optional_analysis_omitted_from_json() {
        let mut result = result_with_keywords("AI", &[]);
        result.keyword_analysis = None;
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("keyword_analysis").is_none());
        assert!(json.get("competitor_analysis").is_none());
    }
}
