// ABOUTME: Azure OpenAI adapter implementing the CompletionClient trait.
// ABOUTME: Routes Chat Completions calls through a deployment-scoped Azure endpoint with api-key auth.

use async_trait::async_trait;
use serde_json::{Value, json};

use baton_core::WireMessage;

use crate::client::{CompletionClient, CompletionError};
use crate::providers::non_empty_env;
use crate::providers::openai::OpenAIClient;

const DEFAULT_API_VERSION: &str = "2024-10-21";
const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
const MAX_TOKENS: u32 = 4096;

/// Azure OpenAI adapter. Same Chat Completions payload as OpenAI, but the
/// deployment name lives in the URL and auth travels in an `api-key` header.
pub struct AzureOpenAIClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_version: String,
    deployment: String,
}

impl AzureOpenAIClient {
    /// Create a new AzureOpenAIClient reading configuration from environment variables.
    /// Required: `AZURE_OPENAI_ENDPOINT` (e.g. https://myresource.openai.azure.com)
    /// Required: `AZURE_OPENAI_API_KEY`
    /// Optional: `AZURE_OPENAI_API_VERSION` (defaults to 2024-10-21)
    /// Optional: `AZURE_OPENAI_DEPLOYMENT` (defaults to gpt-4o)
    pub fn from_env() -> Result<Self, CompletionError> {
        let endpoint = std::env::var("AZURE_OPENAI_ENDPOINT").map_err(|_| {
            CompletionError::ProviderError("AZURE_OPENAI_ENDPOINT not set".to_string())
        })?;

        let api_key = std::env::var("AZURE_OPENAI_API_KEY").map_err(|_| {
            CompletionError::ProviderError("AZURE_OPENAI_API_KEY not set".to_string())
        })?;

        let api_version = non_empty_env("AZURE_OPENAI_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let deployment = non_empty_env("AZURE_OPENAI_DEPLOYMENT")
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());

        Ok(Self::new(api_key, endpoint, api_version, deployment))
    }

    /// Create a new AzureOpenAIClient with explicit configuration.
    pub fn new(api_key: String, endpoint: String, api_version: String, deployment: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
            api_version,
            deployment,
        }
    }

    /// Replace the deployment this client targets. Azure deployments play
    /// the role that model names play elsewhere.
    pub fn with_model(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    /// The deployment-scoped Chat Completions URL for this client.
    pub fn request_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    /// Build the JSON request body. The deployment is addressed in the URL,
    /// so unlike the OpenAI body there is no `model` field here.
    pub fn build_request_body(&self, messages: &[WireMessage]) -> Value {
        json!({
            "max_tokens": MAX_TOKENS,
            "messages": messages,
        })
    }
}

#[async_trait]
impl CompletionClient for AzureOpenAIClient {
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, CompletionError> {
        let body = self.build_request_body(messages);
        let url = self.request_url();

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
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
                "Unauthorized: check AZURE_OPENAI_API_KEY".to_string(),
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

        // Azure serves the standard Chat Completions response schema.
        OpenAIClient::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "azure"
    }

    fn model_name(&self) -> &str {
        &self.deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> AzureOpenAIClient {
        AzureOpenAIClient::new(
            "test-key".to_string(),
            "https://myresource.openai.azure.com/".to_string(),
            "2024-10-21".to_string(),
            "my-gpt4o".to_string(),
        )
    }

    #[test]
    fn azure_client_creation() {
        let client = test_client();

        assert_eq!(client.provider_name(), "azure");
        assert_eq!(client.model_name(), "my-gpt4o");
        assert_eq!(client.api_key, "test-key");
    }

    #[test]
    fn request_url_scopes_deployment_and_trims_slash() {
        let client = test_client();

        assert_eq!(
            client.request_url(),
            "https://myresource.openai.azure.com/openai/deployments/my-gpt4o/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn with_model_replaces_deployment() {
        let client = test_client().with_model("o3-mini");

        assert_eq!(client.model_name(), "o3-mini");
        assert!(client.request_url().contains("/deployments/o3-mini/"));
    }

    #[test]
    fn azure_body_has_no_model_field() {
        let client = test_client();
        let messages = vec![WireMessage::new("user", "Write about rivers.")];

        let body = client.build_request_body(&messages);

        assert!(body.get("model").is_none());
        assert_eq!(body.get("max_tokens").and_then(|m| m.as_u64()), Some(4096));
        let sent = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(sent.len(), 1);
    }
}
