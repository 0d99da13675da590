//! Pipeline lifecycle events.
//!
//! The orchestrator emits one event when a run starts, one per stage
//! transition, and one when the run ends. Sinks decide what to do with them.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::{PipelineStage, RunStatus};
use crate::errors::AutoblogError;
use crate::utils::format_iso8601;

/// Type of a pipeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A run began.
    #[serde(rename = "pipeline.started")]
    PipelineStarted,
    /// A stage began.
    #[serde(rename = "stage.started")]
    StageStarted,
    /// A stage produced its output.
    #[serde(rename = "stage.completed")]
    StageCompleted,
    /// A stage failed.
    #[serde(rename = "stage.failed")]
    StageFailed,
    /// A run reached a terminal state.
    #[serde(rename = "pipeline.completed")]
    PipelineCompleted,
}

impl EventKind {
    /// Returns the dotted event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PipelineStarted => "pipeline.started",
            Self::StageStarted => "stage.started",
            Self::StageCompleted => "stage.completed",
            Self::StageFailed => "stage.failed",
            Self::PipelineCompleted => "pipeline.completed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pipeline lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Run the event belongs to.
    pub run_id: Uuid,
    /// Stage the event concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
    /// Event payload.
    #[serde(default)]
    pub data: Value,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
}

impl PipelineEvent {
    fn new(kind: EventKind, run_id: Uuid, stage: Option<PipelineStage>, data: Value) -> Self {
        Self {
            kind,
            run_id,
            stage,
            data,
            timestamp: Utc::now(),
        }
    }

    /// A run began.
    #[must_use]
    pub fn pipeline_started(run_id: Uuid, topic: &str) -> Self {
        Self::new(EventKind::PipelineStarted, run_id, None, json!({"topic": topic}))
    }

    /// A stage began.
    #[must_use]
    pub fn stage_started(run_id: Uuid, stage: PipelineStage) -> Self {
        Self::new(EventKind::StageStarted, run_id, Some(stage), json!({}))
    }

    /// A stage completed after `duration_ms`.
    #[must_use]
    pub fn stage_completed(run_id: Uuid, stage: PipelineStage, duration_ms: u64) -> Self {
        Self::new(
            EventKind::StageCompleted,
            run_id,
            Some(stage),
            json!({"duration_ms": duration_ms}),
        )
    }

    /// A stage failed after `duration_ms`.
    #[must_use]
    pub fn stage_failed(run_id: Uuid, stage: PipelineStage, duration_ms: u64, error: &AutoblogError) -> Self {
        Self::new(
            EventKind::StageFailed,
            run_id,
            Some(stage),
            json!({"duration_ms": duration_ms, "error": error.to_dict()}),
        )
    }

    /// A run ended with `status`.
    #[must_use]
    pub fn pipeline_completed(run_id: Uuid, status: RunStatus, message: &str) -> Self {
        Self::new(
            EventKind::PipelineCompleted,
            run_id,
            None,
            json!({"status": status, "message": message}),
        )
    }

    /// Converts to a dictionary, with the timestamp as ISO 8601 in UTC.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, Value> {
        let mut dict: HashMap<String, Value> = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        dict.insert("timestamp".to_string(), Value::String(format_iso8601(&self.timestamp)));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names_match_serde() {
        for kind in [
            EventKind::PipelineStarted,
            EventKind::StageStarted,
            EventKind::StageCompleted,
            EventKind::StageFailed,
            EventKind::PipelineCompleted,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }

    #[test]
    fn test_stage_failed_payload() {
        let error = AutoblogError::brief("no sections");
        let event = PipelineEvent::stage_failed(Uuid::nil(), PipelineStage::Brief, 5, &error);
        let dict = event.to_dict();

        assert_eq!(dict["type"], "stage.failed");
        assert_eq!(dict["stage"], "brief");
        assert_eq!(dict["data"]["duration_ms"], 5);
        assert_eq!(dict["data"]["error"]["type"], "brief_generation_failed");
    }

    #[test]
    fn test_to_dict_timestamp_is_utc_iso() {
        let event = PipelineEvent::stage_started(Uuid::nil(), PipelineStage::Draft);
        let dict = event.to_dict();
        let Some(Value::String(ts)) = dict.get("timestamp") else {
            panic!("timestamp missing");
        };
        assert!(ts.ends_with("+00:00"));
        let parsed = crate::utils::parse_timestamp(ts).unwrap();
        assert_eq!(parsed.timestamp_micros(), event.timestamp.timestamp_micros());
    }

    #[test]
    fn test_pipeline_completed_payload() {
        let event = PipelineEvent::pipeline_completed(Uuid::nil(), RunStatus::Partial, "publish failed");
        assert_eq!(event.data["status"], "partial");
        assert!(event.stage.is_none());
    }
}
