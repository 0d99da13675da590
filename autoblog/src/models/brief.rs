//! Content brief produced by the brief stage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One planned section of the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefSection {
    /// Section heading.
    pub heading: String,
    /// What the section should cover.
    #[serde(default)]
    pub description: String,
}

impl BriefSection {
    /// Creates a section.
    #[must_use]
    pub fn new(heading: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            description: description.into(),
        }
    }
}

/// A structured plan for a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBrief {
    /// Proposed title.
    pub title: String,
    /// Ordered content sections.
    pub sections: Vec<BriefSection>,
    /// Target keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Reference material.
    #[serde(default)]
    pub references: Vec<String>,
    /// Style directives such as tone, voice or reading level.
    #[serde(default)]
    pub style_guide: BTreeMap<String, String>,
}

impl ContentBrief {
    /// Checks the brief's semantic constraints.
    ///
    /// Sections must be non-empty with non-blank headings, and when a primary
    /// keyword was analyzed upstream the brief's keywords must include it
    /// (case-insensitively).
    pub fn validate(&self, primary_keyword: Option<&str>) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("brief title is empty".to_string());
        }
        if self.sections.is_empty() {
            return Err("brief has no sections".to_string());
        }
        if let Some(index) = self.sections.iter().position(|s| s.heading.trim().is_empty()) {
            return Err(format!("section {index} has an empty heading"));
        }
        if let Some(primary) = primary_keyword {
            if !self.has_keyword(primary) {
                return Err(format!("brief keywords do not include primary keyword '{primary}'"));
            }
        }
        Ok(())
    }

    /// Whether the brief targets the given keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        let wanted = keyword.trim().to_lowercase();
        self.keywords.iter().any(|k| k.trim().to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief(keywords: &[&str], sections: Vec<BriefSection>) -> ContentBrief {
        ContentBrief {
            title: "How AI Is Changing Healthcare".to_string(),
            sections,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            references: Vec::new(),
            style_guide: BTreeMap::new(),
        }
    }

    #[test]
    fn test_valid_brief() {
        let b = brief(&["ai", "healthcare"], vec![BriefSection::new("Introduction", "Set the scene")]);
        assert!(b.validate(Some("AI")).is_ok());
        assert!(b.validate(None).is_ok());
    }

    #[test]
    fn test_rejects_empty_sections() {
        let b = brief(&["AI"], Vec::new());
        assert_eq!(b.validate(Some("AI")).unwrap_err(), "brief has no sections");
    }

    #[test]
    fn test_rejects_blank_heading() {
        let b = brief(&["AI"], vec![BriefSection::new("Intro", ""), BriefSection::new(" ", "x")]);
        assert!(b.validate(None).unwrap_err().contains("section 1"));
    }

    #[test]
    fn test_rejects_missing_primary_keyword() {
        let b = brief(&["healthcare"], vec![BriefSection::new("Intro", "")]);
        let err = b.validate(Some("AI")).unwrap_err();
        assert!(err.contains("'AI'"));
    }

    #[test]
    fn test_section_description_defaults() {
        let section: BriefSection = serde_json::from_value(serde_json::json!({"heading": "Intro"})).unwrap();
        assert_eq!(section.description, "");
    }
}
