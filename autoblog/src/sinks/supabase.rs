//! Supabase (PostgREST) persistence sink.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::store::{ContentRecord, ContentStore, StoredContent, UserSettings};
use crate::errors::{truncate_body, SinkError};
use crate::utils::parse_timestamp;

/// Table that receives content records.
pub const POSTS_TABLE: &str = "blog_posts";

/// Table that holds per-user preferences.
pub const SETTINGS_TABLE: &str = "user_settings";

/// A [`ContentStore`] backed by a Supabase project's REST API.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Creates a store for the project at `url`.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, SinkError> {
        let base_url = url.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();
        if base_url.is_empty() {
            return Err(SinkError::NotConfigured("SUPABASE_URL is empty".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(SinkError::NotConfigured("SUPABASE_KEY is empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, SinkError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(SinkError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            })
        }
    }
}

#[async_trait]
impl ContentStore for SupabaseStore {
    async fn store(&self, record: &ContentRecord) -> Result<StoredContent, SinkError> {
        let response = self
            .client
            .post(self.table_url(POSTS_TABLE))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let stored = parse_inserted(&Self::read_body(response).await?)?;
        tracing::info!(id = %stored.id, table = POSTS_TABLE, "Stored content in Supabase");
        Ok(stored)
    }

    async fn user_settings(&self, user_id: &str) -> Result<UserSettings, SinkError> {
        let filter = format!("eq.{user_id}");
        let response = self
            .client
            .get(self.table_url(SETTINGS_TABLE))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*"), ("user_id", filter.as_str())])
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        parse_settings(&Self::read_body(response).await?)
    }
}

fn first_row(body: &str) -> Result<Option<Value>, SinkError> {
    let rows: Value =
        serde_json::from_str(body).map_err(|e| SinkError::MalformedResponse(e.to_string()))?;
    match rows {
        Value::Array(rows) => Ok(rows.into_iter().next()),
        Value::Object(_) => Ok(Some(rows)),
        other => Err(SinkError::MalformedResponse(format!(
            "expected rows, got {other}"
        ))),
    }
}

/// Parses the representation returned by an insert.
pub(crate) fn parse_inserted(body: &str) -> Result<StoredContent, SinkError> {
    let row = first_row(body)?
        .ok_or_else(|| SinkError::MalformedResponse("insert returned no rows".to_string()))?;

    let id = match &row["id"] {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(SinkError::MalformedResponse("inserted row has no id".to_string())),
    };
    let created_at = row["created_at"]
        .as_str()
        .ok_or_else(|| SinkError::MalformedResponse("inserted row has no created_at".to_string()))
        .and_then(|s| parse_timestamp(s).map_err(|e| SinkError::MalformedResponse(e.to_string())))?;

    Ok(StoredContent { id, created_at })
}

/// Parses a `user_settings` query result.
pub(crate) fn parse_settings(body: &str) -> Result<UserSettings, SinkError> {
    match first_row(body)? {
        Some(row) => {
            serde_json::from_value(row).map_err(|e| SinkError::MalformedResponse(e.to_string()))
        }
        None => Ok(UserSettings::default()),
    }
}
