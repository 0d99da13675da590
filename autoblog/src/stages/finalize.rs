//! Finalize stage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::Stage;
use crate::contracts::{decode, FinalPayload, FINALIZE_INSTRUCTIONS, FINAL_CONTENT};
use crate::core::PipelineStage;
use crate::errors::AutoblogError;
use crate::models::{Draft, FinalContent, PlaceholderFormat, SeoRequirements};
use crate::providers::CompletionProvider;
use crate::utils::{
    count_words, derive_meta_description, extract_headings, seo_score, truncate_meta_description,
};

/// Input to the finalize stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeInput {
    /// The draft to finalize.
    pub draft: Draft,
    /// SEO requirements the content is scored against.
    pub seo: SeoRequirements,
    /// Style directives from the brief.
    #[serde(default)]
    pub style_guide: BTreeMap<String, String>,
}

impl FinalizeInput {
    /// Creates an input with default SEO requirements and no style guide.
    #[must_use]
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            seo: SeoRequirements::default(),
            style_guide: BTreeMap::new(),
        }
    }

    /// Sets the SEO requirements.
    #[must_use]
    pub fn with_seo(mut self, seo: SeoRequirements) -> Self {
        self.seo = seo;
        self
    }

    /// Sets the style guide.
    #[must_use]
    pub fn with_style_guide(mut self, style_guide: BTreeMap<String, String>) -> Self {
        self.style_guide = style_guide;
        self
    }
}

/// Turns a draft into [`FinalContent`].
///
/// Headings, word count and SEO score are computed from the final content.
/// The meta description is bounded by `seo.meta_description_max`. Content
/// may keep draft placeholders but never introduce new ones.
pub struct FinalizeStage {
    provider: Arc<dyn CompletionProvider>,
    placeholder_format: PlaceholderFormat,
}

impl std::fmt::Debug for FinalizeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinalizeStage")
            .field("provider", &self.provider.name())
            .field("placeholder_format", &self.placeholder_format)
            .finish()
    }
}

impl FinalizeStage {
    /// Creates the stage with the default placeholder format.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            placeholder_format: PlaceholderFormat::default(),
        }
    }

    /// Sets the placeholder format.
    #[must_use]
    pub fn with_placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.placeholder_format = format;
        self
    }
}

#[async_trait]
impl Stage for FinalizeStage {
    type Input = FinalizeInput;
    type Output = FinalContent;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Finalize
    }

    #[tracing::instrument(name = "stage.finalize", skip_all, fields(title = %input.draft.title))]
    async fn run(&self, input: FinalizeInput) -> Result<FinalContent, AutoblogError> {
        let draft = &input.draft;
        let payload = json!({
            "title": draft.title,
            "content": draft.content,
            "placeholders": draft.placeholders,
            "seo_requirements": input.seo,
            "style_guide": input.style_guide,
            "meta_description_max": input.seo.meta_description_max,
        });

        let response = self
            .provider
            .complete(FINALIZE_INSTRUCTIONS, &payload, &FINAL_CONTENT)
            .await
            .map_err(|e| AutoblogError::finalization(e.to_string()))?;
        let reported: FinalPayload = decode(PipelineStage::Finalize, response)?;

        let content = reported.content;
        if content.trim().is_empty() {
            return Err(AutoblogError::finalization("provider returned empty content"));
        }

        let introduced: Vec<String> = self
            .placeholder_format
            .scan(&content)
            .into_iter()
            .filter(|p| !draft.placeholders.contains(p))
            .collect();
        if !introduced.is_empty() {
            return Err(AutoblogError::finalization(format!(
                "content introduces placeholders absent from the draft: {}",
                introduced.join(", ")
            )));
        }

        let max = input.seo.meta_description_max;
        let meta_description = if reported.meta_description.trim().is_empty() {
            derive_meta_description(&content, max)
        } else {
            truncate_meta_description(&reported.meta_description, max)
        };

        let score = seo_score(&content, &input.seo);
        if let Some(claimed) = reported.seo_score {
            if (claimed - score).abs() > f64::EPSILON {
                tracing::debug!(claimed, computed = score, "Replaced reported SEO score");
            }
        }

        let title = if reported.title.trim().is_empty() {
            draft.title.clone()
        } else {
            reported.title.trim().to_string()
        };

        let final_content = FinalContent {
            title,
            meta_description,
            headings: extract_headings(&content),
            word_count: count_words(&content),
            seo_score: score,
            content,
        };
        tracing::debug!(
            words = final_content.word_count,
            seo_score = final_content.seo_score,
            "Content finalized"
        );
        Ok(final_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::testing::fixtures::{draft_payload, final_payload, DRAFT_PLACEHOLDER};
    use crate::testing::ScriptedCompletionProvider;
    use serde_json::json;

    fn draft() -> Draft {
        let payload = draft_payload();
        Draft::from_content(
            payload["title"].as_str().unwrap(),
            payload["content"].as_str().unwrap(),
            &PlaceholderFormat::default(),
        )
    }

    fn stage_with(payload: serde_json::Value) -> FinalizeStage {
        FinalizeStage::new(Arc::new(
            ScriptedCompletionProvider::new().with_response(&FINAL_CONTENT, payload),
        ))
    }

    fn seo() -> SeoRequirements {
        SeoRequirements::new().with_keywords(["AI", "healthcare"])
    }

    #[tokio::test]
    async fn test_finalize_derives_fields() {
        let result = stage_with(final_payload())
            .run(FinalizeInput::new(draft()).with_seo(seo()))
            .await
            .unwrap();

        assert!(result.meta_description.chars().count() <= 160);
        assert!(!result.meta_description.is_empty());
        assert_eq!(
            result.headings,
            vec!["AI in Healthcare".to_string(), "Diagnostics".to_string(), "Operations".to_string()]
        );
        assert_eq!(result.word_count, count_words(&result.content));
        assert_eq!(result.seo_score, seo_score(&result.content, &seo()));
        assert_ne!(result.seo_score, 0.99);
    }

    #[tokio::test]
    async fn test_finalize_respects_custom_meta_bound() {
        let input = FinalizeInput::new(draft()).with_seo(seo().with_meta_description_max(50));
        let result = stage_with(final_payload()).run(input).await.unwrap();
        assert!(result.meta_description.chars().count() <= 50);
    }

    #[tokio::test]
    async fn test_finalize_is_deterministic() {
        let input = FinalizeInput::new(draft()).with_seo(seo());
        let first = stage_with(final_payload()).run(input.clone()).await.unwrap();
        let second = stage_with(final_payload()).run(input).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_finalize_empty_meta_is_derived() {
        let result = stage_with(json!({
            "title": "T",
            "content": "# T\n\nOpening paragraph about AI.\n\nMore.",
            "meta_description": ""
        }))
        .run(FinalizeInput::new(draft()))
        .await
        .unwrap();
        assert_eq!(result.meta_description, "Opening paragraph about AI.");
    }

    #[tokio::test]
    async fn test_finalize_may_keep_draft_placeholder() {
        let content = format!("# T\n\nStill missing {DRAFT_PLACEHOLDER}.");
        let result = stage_with(json!({"title": "T", "content": content, "meta_description": "m"}))
            .run(FinalizeInput::new(draft()))
            .await
            .unwrap();
        assert!(result.content.contains(DRAFT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_finalize_rejects_new_placeholders() {
        let err = stage_with(json!({
            "title": "T",
            "content": "# T\n\nSee [PLACEHOLDER]new fact[PLACEHOLDER].",
            "meta_description": "m"
        }))
        .run(FinalizeInput::new(draft()))
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FinalizationFailed);
        assert!(err.to_string().contains("new fact"));
    }

    #[tokio::test]
    async fn test_finalize_schema_violation() {
        let err = stage_with(json!({"title": "T"}))
            .run(FinalizeInput::new(draft()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaValidationFailed);
    }
}
