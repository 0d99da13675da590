//! Output schema descriptors handed to the completion provider.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;

use crate::core::PipelineStage;

/// A named JSON schema describing a stage's expected provider output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Schema name, unique per stage contract.
    pub name: String,
    /// JSON schema document.
    pub schema: Value,
}

impl OutputSchema {
    /// Creates a schema descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Top-level fields the schema marks as required.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the schema for a stage's provider call, if the stage makes one.
    #[must_use]
    pub fn for_stage(stage: PipelineStage) -> Option<&'static Self> {
        match stage {
            PipelineStage::Research => Some(&RESEARCH_SYNTHESIS),
            PipelineStage::Brief => Some(&CONTENT_BRIEF),
            PipelineStage::Draft => Some(&DRAFT),
            PipelineStage::Finalize => Some(&FINAL_CONTENT),
            PipelineStage::Store | PipelineStage::Publish => None,
        }
    }
}

fn string_array() -> Value {
    json!({"type": "array", "items": {"type": "string"}})
}

/// Research synthesis: key points plus optional gap analysis.
pub static RESEARCH_SYNTHESIS: LazyLock<OutputSchema> = LazyLock::new(|| {
    OutputSchema::new(
        "research_synthesis",
        json!({
            "type": "object",
            "properties": {
                "key_points": string_array(),
                "content_gaps": string_array(),
                "opportunities": string_array()
            },
            "required": ["key_points"]
        }),
    )
});

/// Content brief.
pub static CONTENT_BRIEF: LazyLock<OutputSchema> = LazyLock::new(|| {
    OutputSchema::new(
        "content_brief",
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "heading": {"type": "string"},
                            "description": {"type": "string"}
                        },
                        "required": ["heading"]
                    }
                },
                "keywords": string_array(),
                "references": string_array(),
                "style_guide": {"type": "object", "additionalProperties": {"type": "string"}}
            },
            "required": ["title", "sections", "keywords"]
        }),
    )
});

/// Draft.
pub static DRAFT: LazyLock<OutputSchema> = LazyLock::new(|| {
    OutputSchema::new(
        "draft",
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "content": {"type": "string"},
                "placeholders": string_array(),
                "word_count": {"type": "integer", "minimum": 0}
            },
            "required": ["title", "content"]
        }),
    )
});

/// Final content.
pub static FINAL_CONTENT: LazyLock<OutputSchema> = LazyLock::new(|| {
    OutputSchema::new(
        "final_content",
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "content": {"type": "string"},
                "meta_description": {"type": "string"},
                "headings": string_array(),
                "word_count": {"type": "integer", "minimum": 0},
                "seo_score": {"type": "number", "minimum": 0, "maximum": 1}
            },
            "required": ["title", "content"]
        }),
    )
});
