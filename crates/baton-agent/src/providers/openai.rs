// ABOUTME: OpenAI API adapter implementing the CompletionClient trait.
// ABOUTME: Translates wire messages into Chat Completions API calls and extracts the reply text.

use async_trait::async_trait;
use serde_json::{Value, json};

use baton_core::WireMessage;

use crate::client::{CompletionClient, CompletionError};
use crate::providers::non_empty_env;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 4096;

/// OpenAI adapter. Calls the Chat Completions API and returns the text
/// content of the first choice.
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    /// Create a new OpenAIClient reading configuration from environment variables.
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_BASE_URL` (defaults to https://api.openai.com)
    /// Optional: `OPENAI_MODEL` (defaults to gpt-4o)
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| CompletionError::ProviderError("OPENAI_API_KEY not set".to_string()))?;

        let base_url =
            non_empty_env("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = non_empty_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create a new OpenAIClient with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Replace the model this client targets.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the JSON request body for the Chat Completions API.
    pub fn build_request_body(&self, messages: &[WireMessage]) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": messages,
        })
    }

    /// Parse a Chat Completions response into the generated text.
    pub fn parse_response(response_body: &Value) -> Result<String, CompletionError> {
        let choices = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("missing choices array in response".to_string())
            })?;

        let choice = choices
            .first()
            .ok_or_else(|| CompletionError::InvalidResponse("empty choices array".to_string()))?;

        let message = choice.get("message").ok_or_else(|| {
            CompletionError::InvalidResponse("missing message in choice".to_string())
        })?;

        if let Some(content) = message.get("content").and_then(|c| c.as_str())
            && !content.is_empty()
        {
            return Ok(content.to_string());
        }

        Err(CompletionError::InvalidResponse(
            "no text content in response".to_string(),
        ))
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, CompletionError> {
        let body = self.build_request_body(messages);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CompletionError::ProviderError(
                "Unauthorized: check OPENAI_API_KEY".to_string(),
            ));
        }

        if status.is_server_error() {
            return Err(CompletionError::ProviderError(format!(
                "Server error: {}",
                status
            )));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CompletionError::ProviderError(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response.json().await.map_err(|e| {
            CompletionError::InvalidResponse(format!("failed to parse JSON: {}", e))
        })?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
