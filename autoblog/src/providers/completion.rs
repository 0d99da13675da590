//! The completion provider capability.

use async_trait::async_trait;
use serde_json::Value;

use crate::contracts::OutputSchema;
use crate::errors::ProviderError;

/// Capability: produce a schema-conformant value from instructions and input.
///
/// Implementations are black boxes to the pipeline. The returned value is
/// decoded against `schema` by the calling stage, so a provider need not
/// validate it.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Runs one completion.
    async fn complete(
        &self,
        instructions: &str,
        input: &Value,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError>;

    /// Whether the provider has what it needs to serve requests.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Provider used when no completion credential is configured.
///
/// Every call fails with [`ProviderError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl CompletionProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(
        &self,
        _instructions: &str,
        _input: &Value,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "no completion credential for '{}'",
            schema.name
        )))
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::DRAFT;

    #[tokio::test]
    async fn test_unconfigured_provider_fails() {
        let provider = UnconfiguredProvider;
        let err = provider
            .complete("write", &serde_json::json!({}), &DRAFT)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(err.to_string().contains("draft"));
        assert!(!provider.is_configured());
    }
}
