//! Brief stage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::Stage;
use crate::contracts::{decode, BRIEF_INSTRUCTIONS, CONTENT_BRIEF};
use crate::core::PipelineStage;
use crate::errors::AutoblogError;
use crate::models::{ContentBrief, ResearchResult, DEFAULT_AUDIENCE, DEFAULT_CONTENT_TYPE, DEFAULT_TONE};
use crate::providers::CompletionProvider;

/// Input to the brief stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefInput {
    /// Upstream research.
    pub research: ResearchResult,
    /// Requested content type.
    pub content_type: String,
    /// Intended audience.
    pub target_audience: String,
    /// Requested tone.
    pub tone: String,
}

impl BriefInput {
    /// Creates an input with the default content type, audience and tone.
    #[must_use]
    pub fn new(research: ResearchResult) -> Self {
        Self {
            research,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            target_audience: DEFAULT_AUDIENCE.to_string(),
            tone: DEFAULT_TONE.to_string(),
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    /// Sets the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }
}

/// Turns research into a [`ContentBrief`].
pub struct BriefStage {
    provider: Arc<dyn CompletionProvider>,
}

impl std::fmt::Debug for BriefStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BriefStage")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl BriefStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Stage for BriefStage {
    type Input = BriefInput;
    type Output = ContentBrief;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Brief
    }

    #[tracing::instrument(name = "stage.brief", skip_all, fields(topic = %input.research.topic))]
    async fn run(&self, input: BriefInput) -> Result<ContentBrief, AutoblogError> {
        let research = &input.research;
        let payload = json!({
            "topic": research.topic,
            "key_points": research.key_points,
            "sources": research.sources,
            "keyword_analysis": research.keyword_analysis,
            "competitor_analysis": research.competitor_analysis,
            "content_type": input.content_type,
            "target_audience": input.target_audience,
            "tone": input.tone,
        });

        let response = self
            .provider
            .complete(BRIEF_INSTRUCTIONS, &payload, &CONTENT_BRIEF)
            .await
            .map_err(|e| AutoblogError::brief(e.to_string()))?;
        let mut brief: ContentBrief = decode(PipelineStage::Brief, response)?;

        brief.keywords = brief
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect();
        brief
            .style_guide
            .entry("tone".to_string())
            .or_insert_with(|| input.tone.clone());
        brief
            .style_guide
            .entry("audience".to_string())
            .or_insert_with(|| input.target_audience.clone());

        brief
            .validate(research.primary_keyword())
            .map_err(AutoblogError::brief)?;

        tracing::debug!(sections = brief.sections.len(), title = %brief.title, "Brief generated");
        Ok(brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, ProviderError};
    use crate::models::KeywordAnalysis;
    use crate::testing::fixtures::{brief_payload, empty_brief_payload, TOPIC};
    use crate::testing::ScriptedCompletionProvider;
    use serde_json::json;

    fn research(primary: &str) -> ResearchResult {
        ResearchResult {
            topic: TOPIC.to_string(),
            sources: vec!["https://example.com".to_string()],
            key_points: vec!["AI helps".to_string()],
            keyword_analysis: Some(KeywordAnalysis {
                primary_keyword: primary.to_string(),
                ..KeywordAnalysis::default()
            }),
            competitor_analysis: None,
            search_results: Vec::new(),
            search_degraded: false,
        }
    }

    fn stage_with(payload: serde_json::Value) -> (BriefStage, Arc<ScriptedCompletionProvider>) {
        let provider = Arc::new(ScriptedCompletionProvider::new().with_response(&CONTENT_BRIEF, payload));
        (BriefStage::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_brief_success() {
        let (stage, provider) = stage_with(brief_payload());
        let input = BriefInput::new(research("AI")).with_tone("friendly");

        let brief = stage.run(input).await.unwrap();

        assert_eq!(brief.sections.len(), 3);
        assert_eq!(brief.style_guide["tone"], "friendly");
        assert_eq!(brief.style_guide["voice"], "second person");
        assert_eq!(provider.last_input(&CONTENT_BRIEF).unwrap()["tone"], "friendly");
    }

    #[tokio::test]
    async fn test_brief_primary_keyword_is_case_insensitive() {
        let (stage, _) = stage_with(brief_payload());
        assert!(stage.run(BriefInput::new(research("ai"))).await.is_ok());
    }

    #[tokio::test]
    async fn test_brief_without_sections_fails() {
        let (stage, _) = stage_with(empty_brief_payload());
        let err = stage.run(BriefInput::new(research("AI"))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BriefGenerationFailed);
        assert!(err.to_string().contains("no sections"));
    }

    #[tokio::test]
    async fn test_brief_missing_primary_keyword_fails() {
        let (stage, _) = stage_with(brief_payload());
        let err = stage.run(BriefInput::new(research("robotics"))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BriefGenerationFailed);
        assert!(err.to_string().contains("robotics"));
    }

    #[tokio::test]
    async fn test_brief_provider_failure() {
        let provider = Arc::new(
            ScriptedCompletionProvider::new()
                .with_failure(&CONTENT_BRIEF, ProviderError::Status { status: 500, body: String::new() }),
        );
        let err = BriefStage::new(provider)
            .run(BriefInput::new(research("AI")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BriefGenerationFailed);
    }

    #[tokio::test]
    async fn test_brief_schema_violation() {
        let (stage, _) = stage_with(json!({"sections": []}));
        let err = stage.run(BriefInput::new(research("AI"))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaValidationFailed);
        assert_eq!(err.stage(), Some(PipelineStage::Brief));
    }
}
