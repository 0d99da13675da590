//! The pipeline orchestrator.
//!
//! Runs Research → Brief → Draft → Finalize strictly in order, stores the
//! final content, and publishes it when asked. Every stage runs once; a
//! failure moves the run straight to `Failed` and the remaining stages are
//! never called.

use std::future::Future;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::PipelineConfig;
use crate::core::{PipelineStage, PipelineState, StageArtifact};
use crate::errors::AutoblogError;
use crate::events::{EventSink, NoOpEventSink, PipelineEvent};
use crate::models::{BlogRequest, FinalContent, PipelineResult, SeoRequirements};
use crate::observability::{RunSpanAttributes, SpanTimer, StageSpanAttributes};
use crate::sinks::{ContentRecord, PublishOutcome, StoredContent, UserSettings};
use crate::stages::{
    BriefInput, BriefStage, Collaborators, DraftInput, DraftStage, FinalizeInput, FinalizeStage,
    ResearchStage, Stage,
};
use crate::utils::generate_run_id;

/// Full record of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Run ID.
    pub run_id: Uuid,
    /// Terminal state.
    pub state: PipelineState,
    /// Every state the run entered, starting with `Idle`.
    pub history: Vec<PipelineState>,
    /// Artifacts produced by the content stages, in order.
    pub artifacts: Vec<StageArtifact>,
    /// The failure, if a stage or the publisher failed.
    pub error: Option<AutoblogError>,
    /// What the persistence sink returned.
    pub stored: Option<StoredContent>,
    /// Outcome of the publish step, if publication was requested.
    pub publish: Option<PublishOutcome>,
    /// Caller-facing result.
    pub result: PipelineResult,
}

impl PipelineRun {
    /// Returns the last artifact successfully produced.
    #[must_use]
    pub fn last_artifact(&self) -> Option<&StageArtifact> {
        self.artifacts.last()
    }

    /// Returns the stage the run failed in, if it failed.
    #[must_use]
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        match &self.state {
            PipelineState::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns the final content, if finalize succeeded.
    #[must_use]
    pub fn final_content(&self) -> Option<&FinalContent> {
        self.artifacts.iter().rev().find_map(|a| match a {
            StageArtifact::Final(content) => Some(content),
            _ => None,
        })
    }
}

/// Preferences resolved for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunPreferences {
    audience: String,
    tone: String,
    word_count: usize,
}

impl RunPreferences {
    fn resolve(settings: UserSettings, config: &PipelineConfig) -> Self {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            audience: non_blank(settings.target_audience).unwrap_or_else(|| config.default_audience.clone()),
            tone: non_blank(settings.tone).unwrap_or_else(|| config.default_tone.clone()),
            word_count: settings
                .word_count
                .filter(|w| *w > 0)
                .unwrap_or(config.target_word_count),
        }
    }
}

/// State bookkeeping for one run.
struct RunTracker {
    run_id: Uuid,
    state: PipelineState,
    history: Vec<PipelineState>,
    artifacts: Vec<StageArtifact>,
}

impl RunTracker {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
            artifacts: Vec::new(),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        if !self.state.can_transition_to(&next) {
            tracing::error!(from = %self.state, to = %next, "Illegal pipeline state transition");
        }
        tracing::debug!(from = %self.state, to = %next, "State transition");
        self.history.push(next.clone());
        self.state = next;
    }

    fn record(&mut self, artifact: StageArtifact) {
        self.artifacts.push(artifact);
    }

    /// The stage that is running, or Research before anything ran.
    fn current_stage(&self) -> PipelineStage {
        self.state.running_stage().unwrap_or(PipelineStage::Research)
    }
}

/// Sequences the stages and sinks for blog post requests.
///
/// A `Pipeline` holds no per-run state, so one instance can serve many
/// concurrent requests.
pub struct Pipeline {
    config: PipelineConfig,
    collaborators: Collaborators,
    events: Arc<dyn EventSink>,
    research: ResearchStage,
    brief: BriefStage,
    draft: DraftStage,
    finalize: FinalizeStage,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("collaborators", &self.collaborators)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline from configuration and collaborators.
    #[must_use]
    pub fn new(config: PipelineConfig, collaborators: Collaborators) -> Self {
        let provider = Arc::clone(&collaborators.provider);
        let research = ResearchStage::new(Arc::clone(&provider), Arc::clone(&collaborators.search))
            .with_max_sources(config.max_sources);
        let brief = BriefStage::new(Arc::clone(&provider));
        let draft = DraftStage::new(Arc::clone(&provider))
            .with_placeholder_format(config.placeholder_format.clone());
        let finalize = FinalizeStage::new(provider)
            .with_placeholder_format(config.placeholder_format.clone());

        Self {
            config,
            collaborators,
            events: Arc::new(NoOpEventSink),
            research,
            brief,
            draft,
            finalize,
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline and returns only the caller-facing result.
    pub async fn create_blog_post(&self, request: &BlogRequest) -> PipelineResult {
        self.run(request).await.result
    }

    /// Runs the pipeline for `request`.
    ///
    /// Never panics or returns an error: every failure ends up in the
    /// returned run's state, error and result.
    pub async fn run(&self, request: &BlogRequest) -> PipelineRun {
        let run_id = generate_run_id();
        let span = tracing::info_span!(
            "pipeline.run",
            run_id = %run_id,
            user_id = %request.user_id,
            topic = %request.topic,
            publish = request.publish,
        );
        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, request: &BlogRequest) -> PipelineRun {
        let mut tracker = RunTracker::new(run_id);
        let timer = SpanTimer::start("pipeline");
        tracing::info!("Pipeline started");
        self.events
            .emit(&PipelineEvent::pipeline_started(run_id, &request.topic))
            .await;

        let precheck = request.topic_request(&self.config.default_audience, &self.config.default_tone);
        if let Err(error) = precheck.validate() {
            return self.fail(tracker, request, error).await;
        }

        let prefs = self.load_preferences(&request.user_id).await;
        tracing::debug!(audience = %prefs.audience, tone = %prefs.tone, word_count = prefs.word_count, "Preferences resolved");

        // Research
        let topic = request.topic_request(prefs.audience.clone(), prefs.tone.clone());
        let research = match self
            .execute(&mut tracker, PipelineStage::Research, self.research.run(topic))
            .await
        {
            Ok(research) => research,
            Err(error) => return self.fail(tracker, request, error).await,
        };
        tracker.record(StageArtifact::Research(research.clone()));

        // Brief
        let brief_input = BriefInput::new(research)
            .with_content_type(request.content_type.clone())
            .with_audience(prefs.audience.clone())
            .with_tone(prefs.tone.clone());
        let brief = match self
            .execute(&mut tracker, PipelineStage::Brief, self.brief.run(brief_input))
            .await
        {
            Ok(brief) => brief,
            Err(error) => return self.fail(tracker, request, error).await,
        };
        tracker.record(StageArtifact::Brief(brief.clone()));

        // Draft
        let draft_input = DraftInput::new(brief.clone()).with_word_count(prefs.word_count);
        let draft = match self
            .execute(&mut tracker, PipelineStage::Draft, self.draft.run(draft_input))
            .await
        {
            Ok(draft) => draft,
            Err(error) => return self.fail(tracker, request, error).await,
        };
        tracker.record(StageArtifact::Draft(draft.clone()));

        // Finalize
        let finalize_input = FinalizeInput::new(draft)
            .with_seo(self.seo_requirements(&brief.keywords))
            .with_style_guide(brief.style_guide.clone());
        let content = match self
            .execute(&mut tracker, PipelineStage::Finalize, self.finalize.run(finalize_input))
            .await
        {
            Ok(content) => content,
            Err(error) => return self.fail(tracker, request, error).await,
        };
        tracker.record(StageArtifact::Final(content.clone()));

        // Store
        let record = ContentRecord::new(&content, request);
        let store = Arc::clone(&self.collaborators.store);
        let stored = match self
            .execute(&mut tracker, PipelineStage::Store, async {
                store
                    .store(&record)
                    .await
                    .map_err(|e| AutoblogError::storage(e.to_string()))
            })
            .await
        {
            Ok(stored) => stored,
            Err(error) => return self.fail(tracker, request, error).await,
        };
        tracing::info!(content_id = %stored.id, "Content stored");

        // Publish
        let (result, publish, error) = if request.publish {
            self.publish(&mut tracker, &record, &content.title, &stored).await
        } else {
            let message = format!("Blog post '{}' created", content.title);
            (PipelineResult::success(message, stored.id.clone(), None), None, None)
        };

        tracker.transition(PipelineState::Done(result.status));
        tracing::info!(
            status = %result.status,
            duration_ms = timer.elapsed_millis(),
            "Pipeline completed"
        );
        self.conclude(tracker, request, result, error, Some(stored), publish).await
    }

    async fn publish(
        &self,
        tracker: &mut RunTracker,
        record: &ContentRecord,
        title: &str,
        stored: &StoredContent,
    ) -> (PipelineResult, Option<PublishOutcome>, Option<AutoblogError>) {
        let Some(publisher) = self.collaborators.publisher.clone() else {
            tracing::warn!("Publishing requested but no publisher is configured");
            let outcome = PublishOutcome::skipped("publishing is not configured");
            let message = format!("Blog post '{title}' created; publishing skipped: no publisher configured");
            return (PipelineResult::partial(message, stored.id.clone()), Some(outcome), None);
        };

        let published = self
            .execute(tracker, PipelineStage::Publish, async {
                publisher
                    .publish(record)
                    .await
                    .map_err(|e| AutoblogError::publish(e.to_string()))
            })
            .await;

        match published {
            Ok(receipt) => {
                tracing::info!(url = %receipt.url, "Content published");
                let message = format!("Blog post '{title}' created and published");
                let outcome = PublishOutcome::success(receipt.url.clone());
                (
                    PipelineResult::success(message, stored.id.clone(), Some(receipt.url)),
                    Some(outcome),
                    None,
                )
            }
            Err(error) => {
                let message = format!("Blog post '{title}' created but publishing failed: {error}");
                let outcome = PublishOutcome::error(error.to_string());
                (
                    PipelineResult::partial(message, stored.id.clone()),
                    Some(outcome),
                    Some(error),
                )
            }
        }
    }

    /// Runs one stage future under the stage's timeout, with state, logs
    /// and events around it.
    async fn execute<T, F>(
        &self,
        tracker: &mut RunTracker,
        stage: PipelineStage,
        work: F,
    ) -> Result<T, AutoblogError>
    where
        F: Future<Output = Result<T, AutoblogError>>,
    {
        tracker.transition(stage.running_state());
        self.events
            .emit(&PipelineEvent::stage_started(tracker.run_id, stage))
            .await;
        tracing::debug!(stage = %stage, "Stage started");

        let timer = SpanTimer::start(stage.as_str());
        let outcome = match self.config.stage_timeout(stage) {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .unwrap_or_else(|_| Err(AutoblogError::timeout(stage, limit))),
            None => work.await,
        };
        let duration_ms = timer.elapsed_millis();

        match &outcome {
            Ok(_) => {
                let attrs = StageSpanAttributes::new(stage).finished(timer.elapsed_ms(), None);
                tracing::info!(stage = %stage, duration_ms, attributes = ?attrs.to_attributes(), "Stage completed");
                self.events
                    .emit(&PipelineEvent::stage_completed(tracker.run_id, stage, duration_ms))
                    .await;
            }
            Err(error) => {
                let attrs =
                    StageSpanAttributes::new(stage).finished(timer.elapsed_ms(), Some(error.kind().code()));
                tracing::warn!(stage = %stage, duration_ms, error = %error, attributes = ?attrs.to_attributes(), "Stage failed");
                self.events
                    .emit(&PipelineEvent::stage_failed(tracker.run_id, stage, duration_ms, error))
                    .await;
            }
        }
        outcome
    }

    /// Looks up user settings under the Research timeout. Failure or timeout
    /// falls back to the configured defaults.
    async fn load_preferences(&self, user_id: &str) -> RunPreferences {
        let lookup = self.collaborators.store.user_settings(user_id);
        let outcome = match self.config.stage_timeout(PipelineStage::Research) {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(outcome) => outcome.map_err(|e| e.to_string()),
                Err(_) => Err(format!("timed out after {}ms", limit.as_millis())),
            },
            None => lookup.await.map_err(|e| e.to_string()),
        };
        let settings = outcome.unwrap_or_else(|error| {
            tracing::warn!(error = %error, "User settings lookup failed, using defaults");
            UserSettings::default()
        });
        RunPreferences::resolve(settings, &self.config)
    }

    fn seo_requirements(&self, brief_keywords: &[String]) -> SeoRequirements {
        let mut seo = self.config.seo.clone();
        if seo.target_keywords.is_empty() {
            seo.target_keywords = brief_keywords.to_vec();
        }
        seo
    }

    async fn fail(&self, mut tracker: RunTracker, request: &BlogRequest, error: AutoblogError) -> PipelineRun {
        let stage = tracker.current_stage();
        tracker.transition(PipelineState::Failed {
            stage,
            error: error.clone(),
        });
        tracing::error!(stage = %stage, error = %error, "Pipeline failed");
        let result = PipelineResult::error(format!("Pipeline failed at {stage} stage: {error}"));
        self.conclude(tracker, request, result, Some(error), None, None).await
    }

    async fn conclude(
        &self,
        tracker: RunTracker,
        request: &BlogRequest,
        result: PipelineResult,
        error: Option<AutoblogError>,
        stored: Option<StoredContent>,
        publish: Option<PublishOutcome>,
    ) -> PipelineRun {
        let attrs = RunSpanAttributes::for_request(tracker.run_id, request).with_status(result.status);
        tracing::debug!(attributes = ?attrs.to_attributes(), "Run summary");
        self.events
            .emit(&PipelineEvent::pipeline_completed(
                tracker.run_id,
                result.status,
                &result.message,
            ))
            .await;

        PipelineRun {
            run_id: tracker.run_id,
            state: tracker.state,
            history: tracker.history,
            artifacts: tracker.artifacts,
            error,
            stored,
            publish,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_fall_back_to_config() {
        let config = PipelineConfig::new().with_target_word_count(800);
        let prefs = RunPreferences::resolve(UserSettings::default(), &config);
        assert_eq!(prefs.audience, "general readers");
        assert_eq!(prefs.tone, "professional");
        assert_eq!(prefs.word_count, 800);
    }

    #[test]
    fn test_preferences_override_config() {
        let settings = UserSettings {
            target_audience: Some("clinicians".to_string()),
            tone: Some("  ".to_string()),
            word_count: Some(0),
        };
        let prefs = RunPreferences::resolve(settings, &PipelineConfig::default());
        assert_eq!(prefs.audience, "clinicians");
        assert_eq!(prefs.tone, "professional");
        assert_eq!(prefs.word_count, 1000);
    }

    #[test]
    fn test_tracker_records_history() {
        let mut tracker = RunTracker::new(Uuid::nil());
        assert_eq!(tracker.current_stage(), PipelineStage::Research);
        tracker.transition(PipelineState::Researching);
        tracker.transition(PipelineState::Briefing);
        assert_eq!(tracker.current_stage(), PipelineStage::Brief);
        assert_eq!(tracker.history.len(), 3);
    }
}
