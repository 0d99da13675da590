//! Keyword and competitor analysis over search results.

use std::collections::BTreeMap;

use crate::models::{CompetitorAnalysis, KeywordAnalysis};
use crate::utils::count_occurrences;
use crate::websearch::SearchHit;

/// Primary keyword is the first keyword, the rest are secondary. Mentions
/// count case-insensitive occurrences across hit titles and snippets.
#[must_use]
pub fn analyze_keywords(keywords: &[String], hits: &[SearchHit]) -> KeywordAnalysis {
    let mut iter = keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty());
    let primary_keyword = iter.next().unwrap_or_default().to_string();
    let secondary_keywords: Vec<String> = iter.map(String::from).collect();

    let mut mentions = BTreeMap::new();
    for keyword in std::iter::once(&primary_keyword)
        .chain(secondary_keywords.iter())
        .filter(|k| !k.is_empty())
    {
        let count = hits
            .iter()
            .map(|hit| count_occurrences(&hit.title, keyword) + count_occurrences(&hit.snippet, keyword))
            .sum();
        mentions.insert(keyword.clone(), count);
    }

    KeywordAnalysis {
        primary_keyword,
        secondary_keywords,
        mentions,
        search_volume: None,
        competition: None,
    }
}

/// Distinct domains of `hits`, in order of first appearance.
#[must_use]
pub fn competitor_domains(hits: &[SearchHit]) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for domain in hits.iter().filter_map(SearchHit::domain) {
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    domains
}

/// Builds the competitor analysis from hit domains and the synthesized gaps.
#[must_use]
pub fn analyze_competitors(
    hits: &[SearchHit],
    content_gaps: Vec<String>,
    opportunities: Vec<String>,
) -> CompetitorAnalysis {
    CompetitorAnalysis {
        top_competitors: competitor_domains(hits),
        content_gaps,
        opportunities,
    }
}

/// At most `max` distinct non-empty hit URLs, in order.
#[must_use]
pub fn collect_sources(hits: &[SearchHit], max: usize) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for url in hits.iter().map(|h| h.url.trim()).filter(|u| !u.is_empty()) {
        if sources.len() == max {
            break;
        }
        if !sources.iter().any(|s| s == url) {
            sources.push(url.to_string());
        }
    }
    sources
}
