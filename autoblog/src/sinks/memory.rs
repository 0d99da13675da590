//! In-memory persistence sink.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::store::{ContentRecord, ContentStore, StoredContent, UserSettings};
use crate::errors::SinkError;

/// A [`ContentStore`] that keeps records in process memory.
///
/// Used when no storage endpoint is configured, and in tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: DashMap<String, (StoredContent, ContentRecord)>,
    settings: DashMap<String, UserSettings>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds preferences for a user.
    #[must_use]
    pub fn with_user_settings(self, user_id: impl Into<String>, settings: UserSettings) -> Self {
        self.settings.insert(user_id.into(), settings);
        self
    }

    /// Returns a stored record.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ContentRecord> {
        self.records.get(id).map(|entry| entry.value().1.clone())
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn store(&self, record: &ContentRecord) -> Result<StoredContent, SinkError> {
        let stored = StoredContent {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        self.records
            .insert(stored.id.clone(), (stored.clone(), record.clone()));
        tracing::debug!(id = %stored.id, title = %record.title, "Stored content in memory");
        Ok(stored)
    }

    async fn user_settings(&self, user_id: &str) -> Result<UserSettings, SinkError> {
        Ok(self
            .settings
            .get(user_id)
            .map(|s| s.value().clone())
            .unwrap_or_default())
    }
}
