//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::core::PipelineStage;
use crate::errors::AutoblogError;
use crate::models::{PlaceholderFormat, SeoRequirements, DEFAULT_AUDIENCE, DEFAULT_TONE};
use crate::stages::{DEFAULT_MAX_SOURCES, DEFAULT_WORD_COUNT};

/// Environment variable names read by [`PipelineConfig::from_env`].
pub mod env {
    /// Web search credential.
    pub const SEARCH_CREDENTIAL: &str = "BRAVE_API_KEY";
    /// Completion credential.
    pub const COMPLETION_CREDENTIAL: &str = "OPENAI_API_KEY";
    /// Completion model.
    pub const COMPLETION_MODEL: &str = "OPENAI_MODEL";
    /// Completion API base URL.
    pub const COMPLETION_ENDPOINT: &str = "OPENAI_BASE_URL";
    /// Storage endpoint.
    pub const STORAGE_ENDPOINT: &str = "SUPABASE_URL";
    /// Storage key.
    pub const STORAGE_KEY: &str = "SUPABASE_KEY";
    /// Publishing endpoint.
    pub const PUBLISH_ENDPOINT: &str = "WORDPRESS_URL";
    /// Publishing username.
    pub const PUBLISH_USERNAME: &str = "WORDPRESS_USERNAME";
    /// Publishing password.
    pub const PUBLISH_PASSWORD: &str = "WORDPRESS_PASSWORD";
    /// Default per-stage timeout in seconds.
    pub const STAGE_TIMEOUT: &str = "AUTOBLOG_STAGE_TIMEOUT_SECS";
}

/// Configuration passed to the orchestrator at construction.
///
/// Credentials are never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Web search credential. Without one research uses fallback results.
    #[serde(default, skip_serializing)]
    pub search_credential: Option<String>,
    /// Completion provider credential.
    #[serde(default, skip_serializing)]
    pub completion_credential: Option<String>,
    /// Completion model name.
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    /// Completion API base URL.
    #[serde(default = "default_completion_endpoint")]
    pub completion_endpoint: String,
    /// Persistence endpoint.
    #[serde(default)]
    pub storage_endpoint: Option<String>,
    /// Persistence key.
    #[serde(default, skip_serializing)]
    pub storage_key: Option<String>,
    /// Publishing endpoint. Without one publishing is not configured.
    #[serde(default)]
    pub publish_endpoint: Option<String>,
    /// Publishing username.
    #[serde(default)]
    pub publish_username: Option<String>,
    /// Publishing password.
    #[serde(default, skip_serializing)]
    pub publish_password: Option<String>,
    /// Timeout applied to every stage without an override, in seconds.
    #[serde(default)]
    pub stage_timeout_seconds: Option<f64>,
    /// Per-stage timeout overrides, in seconds.
    #[serde(default)]
    pub stage_timeouts: BTreeMap<PipelineStage, f64>,
    /// Default target length in words.
    #[serde(default = "default_word_count")]
    pub target_word_count: usize,
    /// Default tone.
    #[serde(default = "default_tone")]
    pub default_tone: String,
    /// Default audience.
    #[serde(default = "default_audience")]
    pub default_audience: String,
    /// Cap on research sources.
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
    /// Placeholder delimiters.
    #[serde(default)]
    pub placeholder_format: PlaceholderFormat,
    /// SEO requirements for the finalize stage.
    #[serde(default)]
    pub seo: SeoRequirements,
}

fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_completion_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_word_count() -> usize {
    DEFAULT_WORD_COUNT
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_max_sources() -> usize {
    DEFAULT_MAX_SOURCES
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_credential: None,
            completion_credential: None,
            completion_model: default_completion_model(),
            completion_endpoint: default_completion_endpoint(),
            storage_endpoint: None,
            storage_key: None,
            publish_endpoint: None,
            publish_username: None,
            publish_password: None,
            stage_timeout_seconds: None,
            stage_timeouts: BTreeMap::new(),
            target_word_count: default_word_count(),
            default_tone: default_tone(),
            default_audience: default_audience(),
            max_sources: default_max_sources(),
            placeholder_format: PlaceholderFormat::default(),
            seo: SeoRequirements::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, AutoblogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AutoblogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self {
            search_credential: get(env::SEARCH_CREDENTIAL),
            completion_credential: get(env::COMPLETION_CREDENTIAL),
            storage_endpoint: get(env::STORAGE_ENDPOINT),
            storage_key: get(env::STORAGE_KEY),
            publish_endpoint: get(env::PUBLISH_ENDPOINT),
            publish_username: get(env::PUBLISH_USERNAME),
            publish_password: get(env::PUBLISH_PASSWORD),
            ..Self::default()
        };
        if let Some(model) = get(env::COMPLETION_MODEL) {
            config.completion_model = model;
        }
        if let Some(endpoint) = get(env::COMPLETION_ENDPOINT) {
            config.completion_endpoint = endpoint;
        }
        if let Some(raw) = get(env::STAGE_TIMEOUT) {
            let seconds: f64 = raw.parse().map_err(|_| {
                AutoblogError::Config(format!("{} must be a number of seconds, got '{raw}'", env::STAGE_TIMEOUT))
            })?;
            config.stage_timeout_seconds = Some(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks value constraints.
    pub fn validate(&self) -> Result<(), AutoblogError> {
        if self.target_word_count == 0 {
            return Err(AutoblogError::Config("target_word_count must be positive".to_string()));
        }
        if self.placeholder_format.open.is_empty() || self.placeholder_format.close.is_empty() {
            return Err(AutoblogError::Config("placeholder delimiters must not be empty".to_string()));
        }
        let timeouts = self
            .stage_timeout_seconds
            .iter()
            .map(|s| ("default".to_string(), *s))
            .chain(self.stage_timeouts.iter().map(|(stage, s)| (stage.to_string(), *s)));
        for (name, seconds) in timeouts {
            if seconds <= 0.0 || Duration::try_from_secs_f64(seconds).is_err() {
                return Err(AutoblogError::Config(format!(
                    "{name} stage timeout must be a positive number of seconds, got {seconds}"
                )));
            }
        }
        Ok(())
    }

    /// Returns the timeout for `stage`, if any.
    #[must_use]
    pub fn stage_timeout(&self, stage: PipelineStage) -> Option<Duration> {
        self.stage_timeouts
            .get(&stage)
            .copied()
            .or(self.stage_timeout_seconds)
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// Sets the search credential.
    #[must_use]
    pub fn with_search_credential(mut self, key: impl Into<String>) -> Self {
        self.search_credential = Some(key.into());
        self
    }

    /// Sets the completion credential.
    #[must_use]
    pub fn with_completion_credential(mut self, key: impl Into<String>) -> Self {
        self.completion_credential = Some(key.into());
        self
    }

    /// Sets the storage endpoint and key.
    #[must_use]
    pub fn with_storage(mut self, endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        self.storage_endpoint = Some(endpoint.into());
        self.storage_key = Some(key.into());
        self
    }

    /// Sets the publishing endpoint and credentials.
    #[must_use]
    pub fn with_publisher(
        mut self,
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.publish_endpoint = Some(endpoint.into());
        self.publish_username = Some(username.into());
        self.publish_password = Some(password.into());
        self
    }

    /// Sets the timeout applied to every stage.
    #[must_use]
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout_seconds = Some(timeout.as_secs_f64());
        self
    }

    /// Sets the timeout for one stage.
    #[must_use]
    pub fn with_timeout_for(mut self, stage: PipelineStage, timeout: Duration) -> Self {
        self.stage_timeouts.insert(stage, timeout.as_secs_f64());
        self
    }

    /// Sets the default target length.
    #[must_use]
    pub fn with_target_word_count(mut self, words: usize) -> Self {
        self.target_word_count = words;
        self
    }

    /// Sets the source cap.
    #[must_use]
    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    /// Sets the placeholder format.
    #[must_use]
    pub fn with_placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.placeholder_format = format;
        self
    }

    /// Sets the SEO requirements.
    #[must_use]
    pub fn with_seo(mut self, seo: SeoRequirements) -> Self {
        self.seo = seo;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_word_count, 1000);
        assert_eq!(config.default_tone, "professional");
        assert_eq!(config.max_sources, 5);
        assert_eq!(config.seo.meta_description_max, 160);
        assert_eq!(config.placeholder_format.open, "[PLACEHOLDER]");
        assert!(config.stage_timeout(PipelineStage::Draft).is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = PipelineConfig::from_lookup(lookup(&[
            (env::SEARCH_CREDENTIAL, "brave"),
            (env::COMPLETION_CREDENTIAL, "  "),
            (env::COMPLETION_MODEL, "gpt-4o"),
            (env::STORAGE_ENDPOINT, "https://x.supabase.co"),
            (env::STAGE_TIMEOUT, "2.5"),
        ]))
        .unwrap();

        assert_eq!(config.search_credential.as_deref(), Some("brave"));
        assert!(config.completion_credential.is_none());
        assert_eq!(config.completion_model, "gpt-4o");
        assert_eq!(config.completion_endpoint, "https://api.openai.com/v1");
        assert_eq!(config.storage_endpoint.as_deref(), Some("https://x.supabase.co"));
        assert_eq!(
            config.stage_timeout(PipelineStage::Research),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = PipelineConfig::from_lookup(lookup(&[(env::STAGE_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.to_string().contains(env::STAGE_TIMEOUT));

        let err = PipelineConfig::from_lookup(lookup(&[(env::STAGE_TIMEOUT, "-1")])).unwrap_err();
        assert!(matches!(err, AutoblogError::Config(_)));
    }

    #[test]
    fn test_from_lookup_rejects_unrepresentable_timeout() {
        for raw in ["1e30", "inf", "NaN"] {
            let err = PipelineConfig::from_lookup(lookup(&[(env::STAGE_TIMEOUT, raw)])).unwrap_err();
            assert!(matches!(err, AutoblogError::Config(_)), "{raw} accepted");
        }
    }

    #[test]
    fn test_huge_timeout_is_rejected_not_converted() {
        let config = PipelineConfig::new().with_stage_timeout(Duration::MAX);
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            stage_timeout_seconds: Some(1e30),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(config.stage_timeout(PipelineStage::Draft).is_none());
    }

    #[test]
    fn test_stage_timeout_override() {
        let config = PipelineConfig::new()
            .with_stage_timeout(Duration::from_secs(30))
            .with_timeout_for(PipelineStage::Draft, Duration::from_secs(90));
        assert_eq!(config.stage_timeout(PipelineStage::Draft), Some(Duration::from_secs(90)));
        assert_eq!(config.stage_timeout(PipelineStage::Brief), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_credentials_not_serialized() {
        let config = PipelineConfig::new()
            .with_completion_credential("sk-secret")
            .with_publisher("https://blog", "editor", "hunter2");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("editor"));
    }

    #[test]
    fn test_deserialize_with_stage_timeouts() {
        let config: PipelineConfig = serde_json::from_value(serde_json::json!({
            "stage_timeouts": {"draft": 45.0},
            "max_sources": 3
        }))
        .unwrap();
        assert_eq!(config.max_sources, 3);
        assert_eq!(config.stage_timeout(PipelineStage::Draft), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_validate_rejects_zero_word_count() {
        assert!(PipelineConfig::new().with_target_word_count(0).validate().is_err());
    }
}
