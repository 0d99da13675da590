//! Caller-facing pipeline result.

use serde::{Deserialize, Serialize};

use crate::core::RunStatus;

/// What the pipeline entry point returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Overall outcome.
    pub status: RunStatus,
    /// Human-readable result message.
    pub message: String,
    /// ID assigned by the persistence sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Canonical URL assigned by the publishing sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
}

impl PipelineResult {
    /// Content was stored and, if requested, published.
    #[must_use]
    pub fn success(
        message: impl Into<String>,
        content_id: impl Into<String>,
        content_url: Option<String>,
    ) -> Self {
        Self {
            status: RunStatus::Success,
            message: message.into(),
            content_id: Some(content_id.into()),
            content_url,
        }
    }

    /// Content was stored but not published.
    #[must_use]
    pub fn partial(message: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Partial,
            message: message.into(),
            content_id: Some(content_id.into()),
            content_url: None,
        }
    }

    /// Nothing was stored.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            message: message.into(),
            content_id: None,
            content_url: None,
        }
    }

    /// Returns true for full success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_has_id_but_no_url() {
        let result = PipelineResult::partial("publish failed", "42");
        assert_eq!(result.status, RunStatus::Partial);
        assert_eq!(result.content_id.as_deref(), Some("42"));
        assert!(result.content_url.is_none());
        assert!(!result.is_success());
    }

    #[test]
    fn test_error_serialization_omits_ids() {
        let json = serde_json::to_value(PipelineResult::error("storage failed")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "message": "storage failed"}));
    }

    #[test]
    fn test_success_serialization() {
        let result = PipelineResult::success("ok", "7", Some("https://blog.example.com/p/7".into()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["content_url"], "https://blog.example.com/p/7");
    }
}
