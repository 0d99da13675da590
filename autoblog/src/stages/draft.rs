//! Draft stage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::Stage;
use crate::contracts::{decode, DraftPayload, DRAFT, DRAFT_INSTRUCTIONS};
use crate::core::PipelineStage;
use crate::errors::AutoblogError;
use crate::models::{ContentBrief, Draft, PlaceholderFormat};
use crate::providers::CompletionProvider;

/// Default target length in words.
pub const DEFAULT_WORD_COUNT: usize = 1000;

/// Input to the draft stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInput {
    /// The brief to write from.
    pub brief: ContentBrief,
    /// Target length in words. Must be positive.
    pub word_count: usize,
}

impl DraftInput {
    /// Creates an input with the default target length.
    #[must_use]
    pub fn new(brief: ContentBrief) -> Self {
        Self {
            brief,
            word_count: DEFAULT_WORD_COUNT,
        }
    }

    /// Sets the target length.
    #[must_use]
    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count;
        self
    }
}

/// Turns a brief into a [`Draft`].
///
/// Placeholders and word count are always derived from the returned content;
/// the provider's own report is only compared against them.
pub struct DraftStage {
    provider: Arc<dyn CompletionProvider>,
    placeholder_format: PlaceholderFormat,
}

impl std::fmt::Debug for DraftStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStage")
            .field("provider", &self.provider.name())
            .field("placeholder_format", &self.placeholder_format)
            .finish()
    }
}

impl DraftStage {
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
impl Stage for DraftStage {
    type Input = DraftInput;
    type Output = Draft;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Draft
    }

    #[tracing::instrument(name = "stage.draft", skip_all, fields(title = %input.brief.title))]
    async fn run(&self, input: DraftInput) -> Result<Draft, AutoblogError> {
        if input.word_count == 0 {
            return Err(AutoblogError::draft("target word count must be positive"));
        }

        let brief = &input.brief;
        let payload = json!({
            "title": brief.title,
            "sections": brief.sections,
            "keywords": brief.keywords,
            "references": brief.references,
            "style_guide": brief.style_guide,
            "target_word_count": input.word_count,
            "placeholder": {
                "open": self.placeholder_format.open,
                "close": self.placeholder_format.close,
            },
        });

        let response = self
            .provider
            .complete(DRAFT_INSTRUCTIONS, &payload, &DRAFT)
            .await
            .map_err(|e| AutoblogError::draft(e.to_string()))?;
        let reported: DraftPayload = decode(PipelineStage::Draft, response)?;

        if reported.content.trim().is_empty() {
            return Err(AutoblogError::draft("provider returned empty content"));
        }

        let title = if reported.title.trim().is_empty() {
            brief.title.clone()
        } else {
            reported.title.trim().to_string()
        };
        let draft = Draft::from_content(title, reported.content, &self.placeholder_format);

        if reported.word_count.is_some_and(|n| n != draft.word_count) {
            tracing::debug!(
                reported = reported.word_count,
                actual = draft.word_count,
                "Replaced reported word count"
            );
        }
        if reported.placeholders != draft.placeholders {
            tracing::debug!(
                reported = reported.placeholders.len(),
                actual = draft.placeholders.len(),
                "Replaced reported placeholders"
            );
        }

        tracing::debug!(words = draft.word_count, placeholders = draft.placeholders.len(), "Draft generated");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::models::BriefSection;
    use crate::testing::fixtures::{draft_payload, DRAFT_PLACEHOLDER};
    use crate::testing::ScriptedCompletionProvider;
    use crate::utils::count_words;
    use serde_json::json;

    fn brief() -> ContentBrief {
        ContentBrief {
            title: "AI in Healthcare".to_string(),
            sections: vec![BriefSection::new("Diagnostics", "Imaging")],
            keywords: vec!["AI".to_string()],
            references: Vec::new(),
            style_guide: std::collections::BTreeMap::new(),
        }
    }

    fn stage_with(payload: serde_json::Value) -> (DraftStage, Arc<ScriptedCompletionProvider>) {
        let provider = Arc::new(ScriptedCompletionProvider::new().with_response(&DRAFT, payload));
        (DraftStage::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_draft_recomputes_word_count() {
        let (stage, provider) = stage_with(draft_payload());
        let draft = stage.run(DraftInput::new(brief()).with_word_count(800)).await.unwrap();

        assert_eq!(draft.word_count, count_words(&draft.content));
        assert_ne!(draft.word_count, 999);
        assert_eq!(draft.placeholders, vec![DRAFT_PLACEHOLDER.to_string()]);
        assert!(draft.is_consistent());
        assert_eq!(provider.last_input(&DRAFT).unwrap()["target_word_count"], 800);
    }

    #[tokio::test]
    async fn test_draft_ignores_reported_placeholders_absent_from_content() {
        let (stage, _) = stage_with(json!({
            "title": "T",
            "content": "All facts resolved.",
            "placeholders": ["[PLACEHOLDER]ghost[PLACEHOLDER]"]
        }));
        let draft = stage.run(DraftInput::new(brief())).await.unwrap();
        assert!(draft.placeholders.is_empty());
        assert_eq!(draft.word_count, 3);
    }

    #[tokio::test]
    async fn test_draft_custom_placeholder_format() {
        let provider = Arc::new(ScriptedCompletionProvider::new().with_response(
            &DRAFT,
            json!({"title": "", "content": "Revenue was {{figure}} and {{figure}} again."}),
        ));
        let stage = DraftStage::new(provider).with_placeholder_format(PlaceholderFormat::new("{{", "}}"));
        let draft = stage.run(DraftInput::new(brief())).await.unwrap();

        assert_eq!(draft.title, "AI in Healthcare");
        assert_eq!(draft.placeholders, vec!["{{figure}}".to_string()]);
    }

    #[tokio::test]
    async fn test_draft_rejects_zero_word_count() {
        let (stage, provider) = stage_with(draft_payload());
        let err = stage.run(DraftInput::new(brief()).with_word_count(0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DraftGenerationFailed);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_draft_empty_content_fails() {
        let (stage, _) = stage_with(json!({"title": "T", "content": "  "}));
        let err = stage.run(DraftInput::new(brief())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DraftGenerationFailed);
    }
}
