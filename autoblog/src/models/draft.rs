//! Draft produced by the draft stage.

use serde::{Deserialize, Serialize};

use crate::utils::{count_words, scan_placeholders};

/// Default placeholder delimiter.
pub const DEFAULT_PLACEHOLDER: &str = "[PLACEHOLDER]";

/// The delimiter pair that marks unresolved spans in draft content.
///
/// A placeholder is `open + text + close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderFormat {
    /// Opening delimiter.
    pub open: String,
    /// Closing delimiter.
    pub close: String,
}

impl Default for PlaceholderFormat {
    fn default() -> Self {
        Self::symmetric(DEFAULT_PLACEHOLDER)
    }
}

impl PlaceholderFormat {
    /// Creates a format with distinct delimiters.
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Creates a format that uses the same delimiter on both sides.
    #[must_use]
    pub fn symmetric(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        Self {
            open: delimiter.clone(),
            close: delimiter,
        }
    }

    /// Wraps text as a placeholder.
    #[must_use]
    pub fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.open, text, self.close)
    }

    /// Returns the distinct placeholders in `content`, in order of first appearance.
    #[must_use]
    pub fn scan(&self, content: &str) -> Vec<String> {
        scan_placeholders(content, &self.open, &self.close)
    }
}

/// A first draft of the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Draft title.
    pub title: String,
    /// Draft body.
    pub content: String,
    /// Unresolved placeholders, each present verbatim in `content`.
    pub placeholders: Vec<String>,
    /// Word count of `content`.
    pub word_count: usize,
}

impl Draft {
    /// Builds a draft whose placeholders and word count are derived from `content`.
    #[must_use]
    pub fn from_content(
        title: impl Into<String>,
        content: impl Into<String>,
        format: &PlaceholderFormat,
    ) -> Self {
        let content = content.into();
        Self {
            title: title.into(),
            placeholders: format.scan(&content),
            word_count: count_words(&content),
            content,
        }
    }

    /// Whether the draft's recorded fields agree with its content.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.word_count == count_words(&self.content)
            && self.placeholders.iter().all(|p| self.content.contains(p.as_str()))
    }
}
