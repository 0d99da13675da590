//! Collaborators - capabilities injected into stages and the orchestrator.

use std::sync::Arc;

use crate::providers::CompletionProvider;
use crate::sinks::{ContentPublisher, ContentStore};
use crate::websearch::{FallbackSearch, WebSearch};

/// The external capabilities one pipeline needs.
///
/// Stages receive only the collaborators they use; the orchestrator holds
/// the full set.
#[derive(Clone)]
pub struct Collaborators {
    /// Completion provider for every generation stage.
    pub provider: Arc<dyn CompletionProvider>,
    /// Web search for the research stage.
    pub search: Arc<dyn WebSearch>,
    /// Persistence sink.
    pub store: Arc<dyn ContentStore>,
    /// Publishing sink, if one is configured.
    pub publisher: Option<Arc<dyn ContentPublisher>>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("provider", &self.provider.name())
            .field("search_configured", &self.search.is_configured())
            .field("has_publisher", &self.publisher.is_some())
            .finish()
    }
}

impl Collaborators {
    /// Creates collaborators with fallback search and no publisher.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            provider,
            search: Arc::new(FallbackSearch),
            store,
            publisher: None,
        }
    }

    /// Sets the web search collaborator.
    #[must_use]
    pub fn with_search(mut self, search: Arc<dyn WebSearch>) -> Self {
        self.search = search;
        self
    }

    /// Sets the publishing sink.
    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn ContentPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Returns true if a publishing sink is configured.
    #[must_use]
    pub fn has_publisher(&self) -> bool {
        self.publisher.is_some()
    }
}

#[cfg(feature = "http")]
mod http {
    use std::sync::Arc;

    use super::Collaborators;
    use crate::errors::AutoblogError;
    use crate::pipeline::PipelineConfig;
    use crate::providers::{CompletionProvider, OpenAiProvider, UnconfiguredProvider};
    use crate::sinks::{ContentStore, InMemoryStore, SupabaseStore, WordPressPublisher};
    use crate::websearch::{BraveSearch, FallbackSearch, SearchConfig, WebSearch};

    impl Collaborators {
        /// Builds HTTP collaborators from configuration.
        ///
        /// Missing credentials select the documented fallbacks: fallback search
        /// results, an in-memory store and no publisher. A missing completion
        /// credential yields a provider that fails every call.
        pub fn from_config(config: &PipelineConfig) -> Result<Self, AutoblogError> {
            let provider: Arc<dyn CompletionProvider> = match &config.completion_credential {
                Some(key) => Arc::new(
                    OpenAiProvider::new(Some(key.clone()))
                        .with_base_url(config.completion_endpoint.clone())
                        .with_model(config.completion_model.clone()),
                ),
                None => {
                    tracing::warn!("No completion credential configured, generation stages will fail");
                    Arc::new(UnconfiguredProvider)
                }
            };

            let search: Arc<dyn WebSearch> = match &config.search_credential {
                Some(key) => Arc::new(
                    BraveSearch::new(SearchConfig::new().with_api_key(Some(key.clone())))
                        .map_err(|e| AutoblogError::Config(e.to_string()))?,
                ),
                None => Arc::new(FallbackSearch),
            };

            let store: Arc<dyn ContentStore> = match (&config.storage_endpoint, &config.storage_key) {
                (Some(url), Some(key)) => Arc::new(
                    SupabaseStore::new(url.clone(), key.clone())
                        .map_err(|e| AutoblogError::Config(e.to_string()))?,
                ),
                _ => {
                    tracing::warn!("No storage endpoint configured, storing content in memory");
                    Arc::new(InMemoryStore::new())
                }
            };

            let mut collaborators = Collaborators::new(provider, store).with_search(search);
            if let (Some(url), Some(user), Some(password)) = (
                &config.publish_endpoint,
                &config.publish_username,
                &config.publish_password,
            ) {
                let publisher = WordPressPublisher::new(url.clone(), user.clone(), password.clone())
                    .map_err(|e| AutoblogError::Config(e.to_string()))?;
                collaborators = collaborators.with_publisher(Arc::new(publisher));
            }
            Ok(collaborators)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_from_empty_config_uses_fallbacks() {
            let collaborators = Collaborators::from_config(&PipelineConfig::default()).unwrap();
            assert!(!collaborators.provider.is_configured());
            assert!(!collaborators.search.is_configured());
            assert!(!collaborators.has_publisher());
        }

        #[test]
        fn test_from_full_config() {
            let config = PipelineConfig::default()
                .with_completion_credential("sk-test")
                .with_search_credential("brave-key")
                .with_storage("https://x.supabase.co", "anon")
                .with_publisher("https://blog.example.com", "editor", "pw");
            let collaborators = Collaborators::from_config(&config).unwrap();
            assert!(collaborators.provider.is_configured());
            assert_eq!(collaborators.provider.name(), "openai");
            assert!(collaborators.search.is_configured());
            assert!(collaborators.has_publisher());
        }

        #[test]
        fn test_partial_publisher_config_is_ignored() {
            let mut config = PipelineConfig::default();
            config.publish_endpoint = Some("https://blog.example.com".to_string());
            let collaborators = Collaborators::from_config(&config).unwrap();
            assert!(!collaborators.has_publisher());
        }
    }
}
