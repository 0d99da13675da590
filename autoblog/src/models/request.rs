//! Caller-facing request records.

use serde::{Deserialize, Serialize};

use crate::errors::AutoblogError;

/// Default content type when the caller does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "blog post";

/// Default tone of voice for briefs.
pub const DEFAULT_TONE: &str = "professional";

/// Default target audience for briefs.
pub const DEFAULT_AUDIENCE: &str = "general readers";

/// The request accepted by the pipeline entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogRequest {
    /// ID of the requesting user.
    pub user_id: String,
    /// Main topic of the blog post.
    pub topic: String,
    /// SEO keywords to target.
    pub keywords: Vec<String>,
    /// Type of content to create.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Whether to publish the content after storing it.
    #[serde(default)]
    pub publish: bool,
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl BlogRequest {
    /// Creates a request that stores but does not publish.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        topic: impl Into<String>,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            topic: topic.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            content_type: default_content_type(),
            publish: false,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Requests publication after storage.
    #[must_use]
    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    /// Builds the research input for this request.
    #[must_use]
    pub fn topic_request(
        &self,
        target_audience: impl Into<String>,
        tone: impl Into<String>,
    ) -> TopicRequest {
        TopicRequest {
            topic: self.topic.clone(),
            keywords: self.keywords.clone(),
            content_type: self.content_type.clone(),
            target_audience: target_audience.into(),
            tone: tone.into(),
        }
    }
}

/// Input to the research stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRequest {
    /// Main topic.
    pub topic: String,
    /// Ordered keywords; the first is the primary keyword.
    pub keywords: Vec<String>,
    /// Type of content to create.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Intended audience.
    #[serde(default = "default_audience")]
    pub target_audience: String,
    /// Desired tone of voice.
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

impl TopicRequest {
    /// Creates a topic request with default content type, audience and tone.
    #[must_use]
    pub fn new(topic: impl Into<String>, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            topic: topic.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            content_type: default_content_type(),
            target_audience: default_audience(),
            tone: default_tone(),
        }
    }

    /// Returns the trimmed keywords, dropping blank entries.
    #[must_use]
    pub fn normalized_keywords(&self) -> Vec<String> {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect()
    }

    /// Checks that topic and keywords are non-empty after trimming.
    pub fn validate(&self) -> Result<(), AutoblogError> {
        if self.topic.trim().is_empty() {
            return Err(AutoblogError::InvalidRequest("topic must not be empty".to_string()));
        }
        if self.normalized_keywords().is_empty() {
            return Err(AutoblogError::InvalidRequest(
                "at least one non-empty keyword is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the web search query: the topic followed by the keywords.
    #[must_use]
    pub fn search_query(&self) -> String {
        format!("{} {}", self.topic.trim(), self.normalized_keywords().join(", "))
    }
}
