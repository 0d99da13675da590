//! The persistence sink capability and the record it stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::SinkError;
use crate::models::{BlogRequest, FinalContent};
use crate::utils::content_hash;

/// The row written to the persistence sink for one finalized post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Post title.
    pub title: String,
    /// Post body (Markdown).
    pub content: String,
    /// SEO meta description.
    pub meta_description: String,
    /// Headings in document order.
    pub headings: Vec<String>,
    /// Word count of `content`.
    pub word_count: usize,
    /// Deterministic SEO score.
    pub seo_score: f64,
    /// Requesting user.
    pub author: String,
    /// Request keywords.
    pub tags: Vec<String>,
    /// Requested content type.
    pub content_type: String,
    /// SHA-256 of `content`, hex encoded.
    pub content_hash: String,
}

impl ContentRecord {
    /// Builds the record for `content` produced on behalf of `request`.
    #[must_use]
    pub fn new(content: &FinalContent, request: &BlogRequest) -> Self {
        Self {
            title: content.title.clone(),
            content: content.content.clone(),
            meta_description: content.meta_description.clone(),
            headings: content.headings.clone(),
            word_count: content.word_count,
            seo_score: content.seo_score,
            author: request.user_id.clone(),
            tags: request
                .keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            content_type: request.content_type.clone(),
            content_hash: content_hash(&content.content),
        }
    }

    /// Converts to a dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }
}

/// What the persistence sink returns for a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContent {
    /// Sink-assigned identifier.
    pub id: String,
    /// When the sink stored the record.
    pub created_at: DateTime<Utc>,
}

/// Per-user content preferences.
///
/// Every field is optional; missing fields fall back to configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Preferred audience.
    #[serde(default, alias = "audience")]
    pub target_audience: Option<String>,
    /// Preferred tone.
    #[serde(default)]
    pub tone: Option<String>,
    /// Preferred length in words.
    #[serde(default, alias = "target_word_count")]
    pub word_count: Option<usize>,
}

impl UserSettings {
    /// Whether no preference is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target_audience.is_none() && self.tone.is_none() && self.word_count.is_none()
    }
}

/// Capability: persist finalized content and look up user preferences.
///
/// Implementations serialize their own writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Stores a record and returns its identifier.
    async fn store(&self, record: &ContentRecord) -> Result<StoredContent, SinkError>;

    /// Returns the preferences of `user_id`, empty when none are stored.
    async fn user_settings(&self, user_id: &str) -> Result<UserSettings, SinkError>;
}
