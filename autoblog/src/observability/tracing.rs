//! Span attributes and timing for pipeline runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

use crate::core::{PipelineStage, RunStatus};
use crate::models::BlogRequest;

/// Attributes attached to a whole pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSpanAttributes {
    /// Run ID.
    pub run_id: Option<String>,
    /// Requesting user.
    pub user_id: Option<String>,
    /// Topic being written about.
    pub topic: Option<String>,
    /// Requested content type.
    pub content_type: Option<String>,
    /// Whether publishing was requested.
    pub publish: bool,
    /// Terminal status, once known.
    pub status: Option<RunStatus>,
}

impl RunSpanAttributes {
    /// Builds attributes for `request`.
    #[must_use]
    pub fn for_request(run_id: Uuid, request: &BlogRequest) -> Self {
        Self {
            run_id: Some(run_id.to_string()),
            user_id: Some(request.user_id.clone()),
            topic: Some(request.topic.clone()),
            content_type: Some(request.content_type.clone()),
            publish: request.publish,
            status: None,
        }
    }

    /// Sets the terminal status.
    #[must_use]
    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Flattens to dotted attribute names.
    #[must_use]
    pub fn to_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        if let Some(ref v) = self.run_id {
            attrs.insert("pipeline.run_id".to_string(), v.clone());
        }
        if let Some(ref v) = self.user_id {
            attrs.insert("pipeline.user_id".to_string(), v.clone());
        }
        if let Some(ref v) = self.topic {
            attrs.insert("pipeline.topic".to_string(), v.clone());
        }
        if let Some(ref v) = self.content_type {
            attrs.insert("pipeline.content_type".to_string(), v.clone());
        }
        attrs.insert("pipeline.publish".to_string(), self.publish.to_string());
        if let Some(v) = self.status {
            attrs.insert("pipeline.status".to_string(), v.to_string());
        }
        attrs
    }
}

/// Attributes attached to one stage execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSpanAttributes {
    /// Stage.
    pub stage: PipelineStage,
    /// Whether the stage succeeded.
    pub succeeded: Option<bool>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
    /// Error code if failed.
    pub error: Option<String>,
}

impl StageSpanAttributes {
    /// Creates attributes for `stage`.
    #[must_use]
    pub fn new(stage: PipelineStage) -> Self {
        Self {
            stage,
            succeeded: None,
            duration_ms: None,
            error: None,
        }
    }

    /// Records a finished stage.
    #[must_use]
    pub fn finished(mut self, duration_ms: f64, error: Option<&str>) -> Self {
        self.duration_ms = Some(duration_ms);
        self.succeeded = Some(error.is_none());
        self.error = error.map(ToString::to_string);
        self
    }

    /// Flattens to dotted attribute names.
    #[must_use]
    pub fn to_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        attrs.insert("stage.name".to_string(), self.stage.as_str().to_string());
        if let Some(v) = self.succeeded {
            attrs.insert("stage.succeeded".to_string(), v.to_string());
        }
        if let Some(v) = self.duration_ms {
            attrs.insert("stage.duration_ms".to_string(), format!("{v:.2}"));
        }
        if let Some(ref v) = self.error {
            attrs.insert("stage.error".to_string(), v.clone());
        }
        attrs
    }
}

/// Measures a span's wall-clock duration.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: &'static str,
}

impl SpanTimer {
    /// Starts a timer.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Elapsed time in whole milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Span name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_attributes() {
        let request = BlogRequest::new("user-1", "AI", ["ml"]).with_publish(true);
        let attrs = RunSpanAttributes::for_request(Uuid::nil(), &request)
            .with_status(RunStatus::Partial)
            .to_attributes();

        assert_eq!(attrs.get("pipeline.user_id").map(String::as_str), Some("user-1"));
        assert_eq!(attrs.get("pipeline.topic").map(String::as_str), Some("AI"));
        assert_eq!(attrs.get("pipeline.publish").map(String::as_str), Some("true"));
        assert_eq!(attrs.get("pipeline.status").map(String::as_str), Some("partial"));
    }

    #[test]
    fn test_stage_span_attributes() {
        let attrs = StageSpanAttributes::new(PipelineStage::Draft)
            .finished(123.456, Some("draft_generation_failed"))
            .to_attributes();

        assert_eq!(attrs.get("stage.name").map(String::as_str), Some("draft"));
        assert_eq!(attrs.get("stage.succeeded").map(String::as_str), Some("false"));
        assert_eq!(attrs.get("stage.duration_ms").map(String::as_str), Some("123.46"));
    }

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start("research");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10.0);
        assert!(timer.elapsed_millis() >= 10);
        assert_eq!(timer.name(), "research");
    }
}
