//! Deterministic SEO scoring.
//!
//! The score depends only on the content and the requirements, so identical
//! inputs always score identically regardless of what the provider reported.

use serde::{Deserialize, Serialize};

use super::text::{count_occurrences, count_words, extract_headings};
use crate::models::SeoRequirements;

const COVERAGE_WEIGHT: f64 = 0.4;
const DENSITY_WEIGHT: f64 = 0.2;
const HEADINGS_WEIGHT: f64 = 0.2;
const LENGTH_WEIGHT: f64 = 0.2;

/// Per-component view of an SEO score, each component in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeoBreakdown {
    /// Share of target keywords mentioned at least once.
    pub keyword_coverage: f64,
    /// Average keyword density relative to the target density.
    pub keyword_density: f64,
    /// Heading count relative to the minimum.
    pub headings: f64,
    /// Word count relative to the minimum.
    pub length: f64,
}

impl SeoBreakdown {
    /// Weighted total, clamped to `[0.0, 1.0]` and rounded to four decimals.
    #[must_use]
    pub fn total(&self) -> f64 {
        let raw = self.keyword_coverage * COVERAGE_WEIGHT
            + self.keyword_density * DENSITY_WEIGHT
            + self.headings * HEADINGS_WEIGHT
            + self.length * LENGTH_WEIGHT;
        (raw.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
    }
}

fn ratio(actual: f64, target: f64) -> f64 {
    if target <= 0.0 {
        1.0
    } else {
        (actual / target).clamp(0.0, 1.0)
    }
}

/// Computes the score components for `content`.
#[must_use]
pub fn seo_breakdown(content: &str, requirements: &SeoRequirements) -> SeoBreakdown {
    let words = count_words(content);
    if words == 0 {
        return SeoBreakdown {
            keyword_coverage: 0.0,
            keyword_density: 0.0,
            headings: 0.0,
            length: 0.0,
        };
    }

    let keywords: Vec<&str> = requirements
        .target_keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();

    let (keyword_coverage, keyword_density) = if keywords.is_empty() {
        (1.0, 1.0)
    } else {
        let counts: Vec<usize> = keywords.iter().map(|k| count_occurrences(content, k)).collect();
        let covered = counts.iter().filter(|&&c| c > 0).count();
        let avg_density = counts.iter().map(|&c| c as f64 / words as f64).sum::<f64>()
            / keywords.len() as f64;
        (
            covered as f64 / keywords.len() as f64,
            ratio(avg_density, requirements.target_keyword_density),
        )
    };

    SeoBreakdown {
        keyword_coverage,
        keyword_density,
        headings: ratio(
            extract_headings(content).len() as f64,
            requirements.min_headings as f64,
        ),
        length: ratio(words as f64, requirements.min_word_count as f64),
    }
}

/// Computes the SEO score of `content` in `[0.0, 1.0]`.
#[must_use]
pub fn seo_score(content: &str, requirements: &SeoRequirements) -> f64 {
    seo_breakdown(content, requirements).total()
}
