//! Scripted collaborators for pipeline tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::fixtures;
use crate::contracts::{OutputSchema, CONTENT_BRIEF, DRAFT, FINAL_CONTENT, RESEARCH_SYNTHESIS};
use crate::errors::{ProviderError, SearchError, SinkError};
use crate::providers::CompletionProvider;
use crate::sinks::{
    ContentPublisher, ContentRecord, ContentStore, PublishReceipt, StoredContent, UserSettings,
};
use crate::websearch::{SearchHit, WebSearch};

#[derive(Debug, Clone)]
enum Script {
    Respond(Value),
    Fail(ProviderError),
}

/// A completion provider that answers each output schema with a canned payload.
///
/// Calls are recorded by schema name. A schema without a script fails with
/// [`ProviderError::MalformedResponse`].
#[derive(Debug, Default)]
pub struct ScriptedCompletionProvider {
    scripts: Mutex<HashMap<String, Script>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedCompletionProvider {
    /// Creates a provider with no scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider scripted with the fixture payload for every stage.
    #[must_use]
    pub fn happy_path() -> Self {
        Self::new()
            .with_response(&RESEARCH_SYNTHESIS, fixtures::research_payload())
            .with_response(&CONTENT_BRIEF, fixtures::brief_payload())
            .with_response(&DRAFT, fixtures::draft_payload())
            .with_response(&FINAL_CONTENT, fixtures::final_payload())
    }

    /// Answers `schema` with `payload`.
    #[must_use]
    pub fn with_response(self, schema: &OutputSchema, payload: Value) -> Self {
        self.scripts
            .lock()
            .insert(schema.name.clone(), Script::Respond(payload));
        self
    }

    /// Fails calls for `schema` with `error`.
    #[must_use]
    pub fn with_failure(self, schema: &OutputSchema, error: ProviderError) -> Self {
        self.scripts
            .lock()
            .insert(schema.name.clone(), Script::Fail(error));
        self
    }

    /// Sleeps before answering `schema`.
    #[must_use]
    pub fn with_delay(self, schema: &OutputSchema, delay: Duration) -> Self {
        self.delays.lock().insert(schema.name.clone(), delay);
        self
    }

    /// Returns the schema names called, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Returns the input sent with the most recent call for `schema`.
    #[must_use]
    pub fn last_input(&self, schema: &OutputSchema) -> Option<Value> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(name, _)| *name == schema.name)
            .map(|(_, input)| input.clone())
    }

    /// Returns the number of calls for `schema`.
    #[must_use]
    pub fn call_count(&self, schema: &OutputSchema) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(name, _)| *name == schema.name)
            .count()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _instructions: &str,
        input: &Value,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        self.calls.lock().push((schema.name.clone(), input.clone()));

        let delay = self.delays.lock().get(&schema.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let script = self.scripts.lock().get(&schema.name).cloned();
        match script {
            Some(Script::Respond(payload)) => Ok(payload),
            Some(Script::Fail(error)) => Err(error),
            None => Err(ProviderError::MalformedResponse(format!(
                "no scripted response for '{}'",
                schema.name
            ))),
        }
    }
}

/// A search collaborator that returns fixed hits.
#[derive(Debug, Default)]
pub struct StaticSearch {
    hits: Vec<SearchHit>,
    calls: AtomicUsize,
}

impl StaticSearch {
    /// Creates a search that returns `hits`.
    #[must_use]
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the number of searches run.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }
}

/// A search collaborator that always fails.
#[derive(Debug, Default)]
pub struct FailingSearch {
    calls: AtomicUsize,
}

impl FailingSearch {
    /// Creates a failing search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of searches attempted.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for FailingSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SearchError::Status { status: 503 })
    }
}

/// A publisher that records what it publishes.
#[derive(Debug)]
pub struct RecordingPublisher {
    base_url: String,
    published: Mutex<Vec<ContentRecord>>,
}

impl Default for RecordingPublisher {
    fn default() -> Self {
        Self::new("https://blog.example.com/posts")
    }
}

impl RecordingPublisher {
    /// Creates a publisher whose URLs start with `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Returns the published records.
    #[must_use]
    pub fn published(&self) -> Vec<ContentRecord> {
        self.published.lock().clone()
    }
}

#[async_trait]
impl ContentPublisher for RecordingPublisher {
    async fn publish(&self, record: &ContentRecord) -> Result<PublishReceipt, SinkError> {
        let mut published = self.published.lock();
        published.push(record.clone());
        Ok(PublishReceipt {
            url: format!("{}/{}", self.base_url, published.len()),
        })
    }
}

/// A publisher that always fails.
#[derive(Debug)]
pub struct FailingPublisher {
    error: SinkError,
    calls: AtomicUsize,
}

impl Default for FailingPublisher {
    fn default() -> Self {
        Self::new(SinkError::Auth("invalid credentials".to_string()))
    }
}

impl FailingPublisher {
    /// Creates a publisher that fails with `error`.
    #[must_use]
    pub fn new(error: SinkError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the number of publish attempts.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentPublisher for FailingPublisher {
    async fn publish(&self, _record: &ContentRecord) -> Result<PublishReceipt, SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// A store whose writes and lookups always fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    /// Creates a failing store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of store attempts.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn store(&self, _record: &ContentRecord) -> Result<StoredContent, SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Status {
            status: 503,
            body: "database unavailable".to_string(),
        })
    }

    async fn user_settings(&self, _user_id: &str) -> Result<UserSettings, SinkError> {
        Err(SinkError::Transport("connection refused".to_string()))
    }
}
