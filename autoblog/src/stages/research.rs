//! Research stage: web search, keyword analysis and synthesis.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::keywords::{analyze_competitors, analyze_keywords, collect_sources};
use super::Stage;
use crate::contracts::{decode, ResearchSynthesis, RESEARCH_INSTRUCTIONS, RESEARCH_SYNTHESIS};
use crate::core::PipelineStage;
use crate::errors::AutoblogError;
use crate::models::{ResearchResult, TopicRequest};
use crate::providers::CompletionProvider;
use crate::websearch::{fallback_results, WebSearch};

/// Default cap on research sources.
pub const DEFAULT_MAX_SOURCES: usize = 5;

/// Turns a [`TopicRequest`] into a [`ResearchResult`].
///
/// A failing search degrades to the fallback result set. A failing or
/// empty synthesis fails the stage; key points are never fabricated.
pub struct ResearchStage {
    provider: Arc<dyn CompletionProvider>,
    search: Arc<dyn WebSearch>,
    max_sources: usize,
}

impl std::fmt::Debug for ResearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchStage")
            .field("provider", &self.provider.name())
            .field("search_configured", &self.search.is_configured())
            .field("max_sources", &self.max_sources)
            .finish()
    }
}

impl ResearchStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, search: Arc<dyn WebSearch>) -> Self {
        Self {
            provider,
            search,
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }

    /// Sets the source cap.
    #[must_use]
    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }
}

#[async_trait]
impl Stage for ResearchStage {
    type Input = TopicRequest;
    type Output = ResearchResult;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Research
    }

    #[tracing::instrument(name = "stage.research", skip_all, fields(topic = %input.topic))]
    async fn run(&self, input: TopicRequest) -> Result<ResearchResult, AutoblogError> {
        input.validate()?;
        let keywords = input.normalized_keywords();
        let query = input.search_query();

        let (hits, search_degraded) = match self.search.search(&query).await {
            Ok(hits) => (hits, false),
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "Search failed, using fallback results");
                (fallback_results(&query), true)
            }
        };
        tracing::debug!(hits = hits.len(), degraded = search_degraded, "Search completed");

        let keyword_analysis = analyze_keywords(&keywords, &hits);

        let payload = json!({
            "topic": input.topic.trim(),
            "keywords": keywords,
            "content_type": input.content_type,
            "target_audience": input.target_audience,
            "search_results": hits,
        });
        let response = self
            .provider
            .complete(RESEARCH_INSTRUCTIONS, &payload, &RESEARCH_SYNTHESIS)
            .await
            .map_err(|e| AutoblogError::research(e.to_string()))?;
        let synthesis: ResearchSynthesis = decode(PipelineStage::Research, response)?;

        let key_points: Vec<String> = synthesis
            .key_points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        if key_points.is_empty() {
            return Err(AutoblogError::research("synthesis returned no key points"));
        }

        Ok(ResearchResult {
            topic: input.topic.trim().to_string(),
            sources: collect_sources(&hits, self.max_sources),
            key_points,
            keyword_analysis: Some(keyword_analysis),
            competitor_analysis: Some(analyze_competitors(
                &hits,
                synthesis.content_gaps,
                synthesis.opportunities,
            )),
            search_results: hits,
            search_degraded,
        })
    }
}
