//! The publishing sink capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::store::ContentRecord;
use crate::errors::SinkError;

/// What a successful publish returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Canonical URL of the published post.
    pub url: String,
}

/// Status of a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    /// The post is live.
    Success,
    /// The publisher failed.
    Error,
    /// Publishing was not attempted.
    Skipped,
}

/// Structured outcome of the publish step.
///
/// Publisher failures are captured here rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    /// Attempt status.
    pub status: PublishStatus,
    /// Canonical URL on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Failure message on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why publishing was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PublishOutcome {
    /// A successful publish.
    #[must_use]
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Success,
            url: Some(url.into()),
            error: None,
            message: None,
        }
    }

    /// A failed publish.
    #[must_use]
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Error,
            url: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// A publish that was not attempted.
    #[must_use]
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Skipped,
            url: None,
            error: None,
            message: Some(message.into()),
        }
    }
}

impl From<Result<PublishReceipt, SinkError>> for PublishOutcome {
    fn from(result: Result<PublishReceipt, SinkError>) -> Self {
        match result {
            Ok(receipt) => Self::success(receipt.url),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Capability: push finalized content to a CMS.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Publishes a record and returns its canonical URL.
    async fn publish(&self, record: &ContentRecord) -> Result<PublishReceipt, SinkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_result() {
        let ok: PublishOutcome = Ok(PublishReceipt {
            url: "https://blog.example.com/p/1".to_string(),
        })
        .into();
        assert_eq!(ok.status, PublishStatus::Success);
        assert_eq!(ok.url.as_deref(), Some("https://blog.example.com/p/1"));

        let err: PublishOutcome = Err(SinkError::Auth("bad password".to_string())).into();
        assert_eq!(err.status, PublishStatus::Error);
        assert!(err.url.is_none());
        assert!(err.error.as_deref().is_some_and(|e| e.contains("bad password")));
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(PublishOutcome::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "error": "boom"}));

        let json = serde_json::to_value(PublishOutcome::skipped("not configured")).unwrap();
        assert_eq!(json["status"], "skipped");
    }
}
