//! OpenAI-compatible chat completions provider.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::completion::CompletionProvider;
use crate::contracts::OutputSchema;
use crate::errors::{truncate_body, ProviderError};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Completion provider backed by an OpenAI-compatible `/chat/completions` API.
///
/// The role instructions become the system message, the structured input is
/// serialized into the user message, and the output schema is sent as a
/// `json_schema` response format.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiProvider {
    /// Creates a provider with the default endpoint and model.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("OpenAI provider created without API key");
        }
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.4,
        }
    }

    /// Sets the API base URL (e.g. an Azure deployment or a local proxy).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, instructions: &str, input: &Value, schema: &OutputSchema) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": instructions},
                {"role": "user", "content": input.to_string()}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema
                }
            }
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        instructions: &str,
        input: &Value,
        schema: &OutputSchema,
    ) -> Result<Value, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %self.model, schema = %schema.name, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(instructions, input, schema))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        parse_completion(&json)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Extracts the JSON document from a chat completion response.
pub(crate) fn parse_completion(json: &Value) -> Result<Value, ProviderError> {
    let message = &json["choices"][0]["message"];
    if let Some(refusal) = message["refusal"].as_str() {
        return Err(ProviderError::MalformedResponse(format!("model refused: {refusal}")));
    }
    let content = message["content"]
        .as_str()
        .ok_or_else(|| ProviderError::MalformedResponse("response has no message content".to_string()))?;

    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ProviderError::MalformedResponse(format!("content is not JSON: {e}")))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::CONTENT_BRIEF;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new(Some("k".into())).with_model("gpt-test");
        let body = provider.request_body("be brief", &json!({"topic": "AI"}), &CONTENT_BRIEF);

        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["content"], r#"{"topic":"AI"}"#);
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "content_brief");
    }

    #[test]
    fn test_parse_completion() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"key_points\": [\"a\"]}"}}]
        });
        assert_eq!(parse_completion(&response).unwrap(), json!({"key_points": ["a"]}));
    }

    #[test]
    fn test_parse_completion_fenced() {
        let response = json!({
            "choices": [{"message": {"content": "```json\n{\"a\": 1}\n```"}}]
        });
        assert_eq!(parse_completion(&response).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_completion_errors() {
        let refused = json!({"choices": [{"message": {"content": null, "refusal": "no"}}]});
        assert!(matches!(
            parse_completion(&refused),
            Err(ProviderError::MalformedResponse(m)) if m.contains("refused")
        ));

        let empty = json!({"choices": []});
        assert!(parse_completion(&empty).is_err());

        let not_json = json!({"choices": [{"message": {"content": "hello"}}]});
        assert!(parse_completion(&not_json).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider = OpenAiProvider::new(None);
        assert!(!provider.is_configured());
        let err = provider
            .complete("x", &json!({}), &CONTENT_BRIEF)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = OpenAiProvider::new(None).with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.base_url, "http://localhost:8080/v1");
    }
}
