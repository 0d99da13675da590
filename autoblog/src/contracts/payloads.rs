//! Typed views of provider payloads.
//!
//! Provider output is decoded into these records before any stage logic runs;
//! a payload that does not decode is a schema violation, not a stage failure.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::OutputSchema;
use crate::core::PipelineStage;
use crate::errors::AutoblogError;

/// Research synthesis returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSynthesis {
    /// Key findings.
    pub key_points: Vec<String>,
    /// Topics the existing coverage misses.
    #[serde(default)]
    pub content_gaps: Vec<String>,
    /// Angles worth pursuing.
    #[serde(default)]
    pub opportunities: Vec<String>,
}

/// Draft returned by the provider.
///
/// `placeholders` and `word_count` are the provider's own report and are
/// only compared against the values derived from `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPayload {
    /// Draft title.
    pub title: String,
    /// Draft body.
    pub content: String,
    /// Reported placeholders.
    #[serde(default)]
    pub placeholders: Vec<String>,
    /// Reported word count.
    #[serde(default)]
    pub word_count: Option<usize>,
}

/// Final content returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalPayload {
    /// Final title.
    pub title: String,
    /// Final body.
    pub content: String,
    /// Proposed meta description.
    #[serde(default)]
    pub meta_description: String,
    /// Reported SEO score.
    #[serde(default)]
    pub seo_score: Option<f64>,
}

/// Decodes a provider payload into `T`.
///
/// Returns [`AutoblogError::SchemaValidationFailed`] when the value is not an
/// object, lacks a field the stage's [`OutputSchema`] requires, or mistypes a
/// field.
pub fn decode<T: DeserializeOwned>(stage: PipelineStage, payload: Value) -> Result<T, AutoblogError> {
    if !payload.is_object() {
        return Err(AutoblogError::schema(
            stage,
            format!("expected a JSON object, got {}", json_type(&payload)),
        ));
    }
    if let Some(schema) = OutputSchema::for_stage(stage) {
        let missing = schema
            .required_fields()
            .into_iter()
            .find(|field| payload.get(*field).map_or(true, Value::is_null));
        if let Some(field) = missing {
            return Err(AutoblogError::schema(
                stage,
                format!("missing required field `{field}` for {}", schema.name),
            ));
        }
    }
    serde_json::from_value(payload).map_err(|e| AutoblogError::schema(stage, e.to_string()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
