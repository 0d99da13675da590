//! Error types for the autoblog pipeline.
//!
//! `AutoblogError` is the taxonomy surfaced by stages and the orchestrator.
//! Collaborators (completion provider, web search, sinks) report their own
//! error enums, which stages convert into the taxonomy kind they own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::core::PipelineStage;

/// The main error type for pipeline operations.
#[derive(Debug, Clone, Error)]
pub enum AutoblogError {
    /// The caller's request violates an input constraint.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The research stage could not synthesize a result.
    #[error("Research failed: {reason}")]
    ResearchFailed {
        /// Why research failed.
        reason: String,
    },

    /// The brief stage failed or produced an invalid brief.
    #[error("Brief generation failed: {reason}")]
    BriefGenerationFailed {
        /// Why brief generation failed.
        reason: String,
    },

    /// The draft stage failed or produced an invalid draft.
    #[error("Draft generation failed: {reason}")]
    DraftGenerationFailed {
        /// Why drafting failed.
        reason: String,
    },

    /// The finalize stage failed or produced invalid content.
    #[error("Finalization failed: {reason}")]
    FinalizationFailed {
        /// Why finalization failed.
        reason: String,
    },

    /// The persistence sink rejected the record.
    #[error("Storage failed: {reason}")]
    StorageFailed {
        /// Why storage failed.
        reason: String,
    },

    /// The publishing sink rejected the record.
    #[error("Publish failed: {reason}")]
    PublishFailed {
        /// Why publishing failed.
        reason: String,
    },

    /// A stage exceeded its caller-supplied timeout.
    #[error("Stage '{stage}' timed out after {timeout_ms}ms")]
    StageTimeout {
        /// The stage that timed out.
        stage: PipelineStage,
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// A provider payload did not match the stage's output schema.
    #[error("Schema validation failed for {stage} output: {reason}")]
    SchemaValidationFailed {
        /// The stage whose output was invalid.
        stage: PipelineStage,
        /// What did not match.
        reason: String,
    },

    /// Configuration cannot build a collaborator.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable classification of an [`AutoblogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`AutoblogError::InvalidRequest`].
    InvalidRequest,
    /// See [`AutoblogError::ResearchFailed`].
    ResearchFailed,
    /// See [`AutoblogError::BriefGenerationFailed`].
    BriefGenerationFailed,
    /// See [`AutoblogError::DraftGenerationFailed`].
    DraftGenerationFailed,
    /// See [`AutoblogError::FinalizationFailed`].
    FinalizationFailed,
    /// See [`AutoblogError::StorageFailed`].
    StorageFailed,
    /// See [`AutoblogError::PublishFailed`].
    PublishFailed,
    /// See [`AutoblogError::StageTimeout`].
    StageTimeout,
    /// See [`AutoblogError::SchemaValidationFailed`].
    SchemaValidationFailed,
    /// See [`AutoblogError::Config`].
    Config,
}

impl ErrorKind {
    /// Returns the stable code for this kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::ResearchFailed => "research_failed",
            Self::BriefGenerationFailed => "brief_generation_failed",
            Self::DraftGenerationFailed => "draft_generation_failed",
            Self::FinalizationFailed => "finalization_failed",
            Self::StorageFailed => "storage_failed",
            Self::PublishFailed => "publish_failed",
            Self::StageTimeout => "stage_timeout",
            Self::SchemaValidationFailed => "schema_validation_failed",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl AutoblogError {
    /// Creates a research failure.
    #[must_use]
    pub fn research(reason: impl Into<String>) -> Self {
        Self::ResearchFailed { reason: reason.into() }
    }

    /// Creates a brief generation failure.
    #[must_use]
    pub fn brief(reason: impl Into<String>) -> Self {
        Self::BriefGenerationFailed { reason: reason.into() }
    }

    /// Creates a draft generation failure.
    #[must_use]
    pub fn draft(reason: impl Into<String>) -> Self {
        Self::DraftGenerationFailed { reason: reason.into() }
    }

    /// Creates a finalization failure.
    #[must_use]
    pub fn finalization(reason: impl Into<String>) -> Self {
        Self::FinalizationFailed { reason: reason.into() }
    }

    /// Creates a storage failure.
    #[must_use]
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::StorageFailed { reason: reason.into() }
    }

    /// Creates a publish failure.
    #[must_use]
    pub fn publish(reason: impl Into<String>) -> Self {
        Self::PublishFailed { reason: reason.into() }
    }

    /// Creates a schema validation failure for a stage.
    #[must_use]
    pub fn schema(stage: PipelineStage, reason: impl Into<String>) -> Self {
        Self::SchemaValidationFailed {
            stage,
            reason: reason.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(stage: PipelineStage, timeout: std::time::Duration) -> Self {
        Self::StageTimeout {
            stage,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::ResearchFailed { .. } => ErrorKind::ResearchFailed,
            Self::BriefGenerationFailed { .. } => ErrorKind::BriefGenerationFailed,
            Self::DraftGenerationFailed { .. } => ErrorKind::DraftGenerationFailed,
            Self::FinalizationFailed { .. } => ErrorKind::FinalizationFailed,
            Self::StorageFailed { .. } => ErrorKind::StorageFailed,
            Self::PublishFailed { .. } => ErrorKind::PublishFailed,
            Self::StageTimeout { .. } => ErrorKind::StageTimeout,
            Self::SchemaValidationFailed { .. } => ErrorKind::SchemaValidationFailed,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the stage an error is attributed to, when it names one.
    #[must_use]
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::ResearchFailed { .. } => Some(PipelineStage::Research),
            Self::BriefGenerationFailed { .. } => Some(PipelineStage::Brief),
            Self::DraftGenerationFailed { .. } => Some(PipelineStage::Draft),
            Self::FinalizationFailed { .. } => Some(PipelineStage::Finalize),
            Self::StorageFailed { .. } => Some(PipelineStage::Store),
            Self::PublishFailed { .. } => Some(PipelineStage::Publish),
            Self::StageTimeout { stage, .. } | Self::SchemaValidationFailed { stage, .. } => {
                Some(*stage)
            }
            Self::InvalidRequest(_) | Self::Config(_) => None,
        }
    }

    /// Whether a caller-side retry of the same stage call can help.
    ///
    /// Request and configuration failures repeat on every attempt. Anything
    /// produced by a collaborator may differ on the next one.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ResearchFailed { .. }
                | Self::BriefGenerationFailed { .. }
                | Self::DraftGenerationFailed { .. }
                | Self::FinalizationFailed { .. }
                | Self::StorageFailed { .. }
                | Self::PublishFailed { .. }
                | Self::StageTimeout { .. }
                | Self::SchemaValidationFailed { .. }
        )
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind().code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Some(stage) = self.stage() {
            map.insert("stage".to_string(), serde_json::json!(stage.to_string()));
        }
        map
    }
}

/// Errors reported by a completion provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// No credential is configured for the provider.
    #[error("Completion provider not configured: {0}")]
    NotConfigured(String),

    /// The request could not be sent or the response not read.
    #[error("Completion request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("Completion provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The provider answered but the payload was not usable.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Errors reported by a web search collaborator.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The request could not be sent or the response not read.
    #[error("Search request failed: {0}")]
    Transport(String),

    /// The search API answered with a non-success status.
    #[error("Search API returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The search API answered with an unexpected shape.
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),
}

/// Errors reported by a persistence or publishing sink.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink is missing configuration.
    #[error("Sink not configured: {0}")]
    NotConfigured(String),

    /// Authentication with the sink failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request could not be sent or the response not read.
    #[error("Sink request failed: {0}")]
    Transport(String),

    /// The sink answered with a non-success status.
    #[error("Sink returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The sink answered with an unexpected shape.
    #[error("Malformed sink response: {0}")]
    MalformedResponse(String),
}

/// Truncates a response body for inclusion in an error message.
#[must_use]
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_kind_codes() {
        assert_eq!(AutoblogError::research("x").kind(), ErrorKind::ResearchFailed);
        assert_eq!(AutoblogError::brief("x").kind().code(), "brief_generation_failed");
        assert_eq!(
            AutoblogError::schema(PipelineStage::Draft, "missing content").kind(),
            ErrorKind::SchemaValidationFailed
        );
    }

    #[test]
    fn test_stage_attribution() {
        assert_eq!(AutoblogError::draft("x").stage(), Some(PipelineStage::Draft));
        assert_eq!(AutoblogError::publish("x").stage(), Some(PipelineStage::Publish));
        assert_eq!(
            AutoblogError::timeout(PipelineStage::Brief, Duration::from_millis(50)).stage(),
            Some(PipelineStage::Brief)
        );
        assert_eq!(AutoblogError::InvalidRequest("x".into()).stage(), None);
    }

    #[test]
    fn test_timeout_message() {
        let err = AutoblogError::timeout(PipelineStage::Finalize, Duration::from_millis(250));
        assert_eq!(err.to_string(), "Stage 'finalize' timed out after 250ms");
    }

    #[test]
    fn test_to_dict() {
        let dict = AutoblogError::storage("connection refused").to_dict();
        assert_eq!(dict.get("type").unwrap(), "storage_failed");
        assert_eq!(dict.get("stage").unwrap(), "store");
        assert!(dict
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn test_retryable() {
        assert!(AutoblogError::brief("provider down").is_retryable());
        assert!(!AutoblogError::InvalidRequest("empty topic".into()).is_retryable());
        assert!(!AutoblogError::Config("missing url".into()).is_retryable());
    }

    #[test]
    fn test_truncate_body() {
        let long = "a".repeat(600);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 515);
        assert_eq!(truncate_body("short"), "short");
    }
}
