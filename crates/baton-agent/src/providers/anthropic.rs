// ABOUTME: Anthropic Claude API adapter implementing the CompletionClient trait.
// ABOUTME: Hoists the system message, coalesces turns to alternate roles, and joins text blocks from replies.

use async_trait::async_trait;
use serde_json::{Value, json};

use baton_core::WireMessage;

use crate::client::{CompletionClient, CompletionError};
use crate::providers::non_empty_env;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic Claude adapter. Calls the Messages API and returns the joined
/// text blocks of the reply.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    /// Create a new AnthropicClient reading configuration from environment variables.
    /// Required: `ANTHROPIC_API_KEY`
    /// Optional: `ANTHROPIC_BASE_URL` (defaults to https://api.anthropic.com)
    /// Optional: `ANTHROPIC_MODEL` (defaults to claude-sonnet-4-5-20250929)
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            CompletionError::ProviderError("ANTHROPIC_API_KEY not set".to_string())
        })?;

        let base_url =
            non_empty_env("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = non_empty_env("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create a new AnthropicClient with explicit configuration.
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

    /// Build the JSON request body for the Messages API.
    ///
    /// A leading system wire message becomes the top-level `system` field.
    /// The remaining turns are coalesced so roles strictly alternate, which
    /// the Messages API requires; pipelines produce back-to-back assistant
    /// turns whenever one agent replies right after another.
    pub fn build_request_body(&self, messages: &[WireMessage]) -> Value {
        let (system, rest) = match messages.split_first() {
            Some((first, rest)) if first.role == "system" => {
                (Some(first.content.clone()), rest)
            }
            _ => (None, messages),
        };

        let turns: Vec<Value> = rest
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();
        let turns = coalesce_messages(turns);

        let mut body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": turns,
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }
        body
    }

    /// Parse a Messages API response into the generated text. Multiple text
    /// blocks are joined with blank lines.
    pub fn parse_response(response_body: &Value) -> Result<String, CompletionError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("missing content array in response".to_string())
            })?;

        let mut text = String::new();
        for block in content {
            if block.get("type").and_then(|t| t.as_str()) == Some("text")
                && let Some(piece) = block.get("text").and_then(|t| t.as_str())
            {
                if !text.is_empty() {
                    text.push_str("\n\n");
                }
                text.push_str(piece);
            }
        }

        if text.is_empty() {
            return Err(CompletionError::InvalidResponse(
                "no text content in response".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Coalesce consecutive messages with the same role into single messages.
/// The Anthropic API requires alternating user/assistant messages.
fn coalesce_messages(messages: Vec<Value>) -> Vec<Value> {
    if messages.is_empty() {
        return messages;
    }

    let mut result: Vec<Value> = Vec::new();

    for msg in messages {
        let role = msg.get("role").and_then(|r| r.as_str()).unwrap_or("user");
        let content = msg
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string();

        if let Some(last) = result.last_mut() {
            let last_role = last.get("role").and_then(|r| r.as_str()).unwrap_or("");

            if last_role == role {
                let prev_content = last.get("content").and_then(|c| c.as_str()).unwrap_or("");
                let merged = format!("{}\n\n{}", prev_content, content);
                *last = json!({
                    "role": role,
                    "content": merged
                });
                continue;
            }
        }

        result.push(json!({
            "role": role,
            "content": content
        }));
    }

    result
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, CompletionError> {
        let body = self.build_request_body(messages);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
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
                "Unauthorized: check ANTHROPIC_API_KEY".to_string(),
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
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> AnthropicClient {
        AnthropicClient::new(
            "test-key".to_string(),
            "https://api.anthropic.com".to_string(),
            "claude-sonnet-4-5-20250929".to_string(),
        )
    }

    #[test]
    fn anthropic_client_creation() {
        let client = test_client();

        assert_eq!(client.provider_name(), "anthropic");
        assert_eq!(client.model_name(), "claude-sonnet-4-5-20250929");
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn anthropic_hoists_leading_system_message() {
        let client = test_client();
        let messages = vec![
            WireMessage::new("system", "You review documents."),
            WireMessage::new("user", "Review this draft."),
        ];

        let body = client.build_request_body(&messages);

        assert_eq!(
            body.get("system").and_then(|s| s.as_str()),
            Some("You review documents.")
        );
        let turns = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].get("role").and_then(|r| r.as_str()), Some("user"));
    }

    #[test]
    fn anthropic_omits_system_field_when_absent() {
        let client = test_client();
        let messages = vec![WireMessage::new("user", "Review this draft.")];

        let body = client.build_request_body(&messages);

        assert!(body.get("system").is_none());
        assert_eq!(body.get("max_tokens").and_then(|m| m.as_u64()), Some(4096));
    }

    #[test]
    fn anthropic_coalesces_back_to_back_assistant_turns() {
        // The shape a third agent sees mid-pipeline: seed, then two replies.
        let client = test_client();
        let messages = vec![
            WireMessage::new("system", "You summarize."),
            WireMessage::new("user", "the task"),
            WireMessage::new("assistant", "first reply"),
            WireMessage::new("assistant", "second reply"),
        ];

        let body = client.build_request_body(&messages);
        let turns = body.get("messages").and_then(|m| m.as_array()).unwrap();

        assert_eq!(turns.len(), 2);
        let merged = turns[1].get("content").and_then(|c| c.as_str()).unwrap();
        assert!(merged.contains("first reply"));
        assert!(merged.contains("second reply"));
    }

    #[test]
    fn coalesce_merges_consecutive_same_role() {
        let messages = vec![
            json!({"role": "user", "content": "First"}),
            json!({"role": "user", "content": "Second"}),
            json!({"role": "assistant", "content": "Reply"}),
            json!({"role": "user", "content": "Third"}),
        ];

        let result = coalesce_messages(messages);
        assert_eq!(result.len(), 3);
        assert!(
            result[0]
                .get("content")
                .unwrap()
                .as_str()
                .unwrap()
                .contains("First")
        );
        assert!(
            result[0]
                .get("content")
                .unwrap()
                .as_str()
                .unwrap()
                .contains("Second")
        );
    }

    #[test]
    fn anthropic_parses_text_response() {
        let response = json!({
            "id": "msg_123",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "APPROVE" }
            ],
            "stop_reason": "end_turn"
        });

        let text = AnthropicClient::parse_response(&response).unwrap();
        assert_eq!(text, "APPROVE");
    }

    #[test]
    fn anthropic_joins_multiple_text_blocks() {
        let response = json!({
            "id": "msg_456",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "First paragraph." },
                { "type": "text", "text": "Second paragraph." }
            ],
            "stop_reason": "end_turn"
        });

        let text = AnthropicClient::parse_response(&response).unwrap();
        assert_eq!(text, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn anthropic_rejects_missing_content() {
        let response = json!({ "id": "msg_789", "type": "message" });

        let result = AnthropicClient::parse_response(&response);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("missing content array")
        );
    }

    #[test]
    fn anthropic_rejects_empty_content() {
        let response = json!({
            "id": "msg_empty",
            "type": "message",
            "role": "assistant",
            "content": [],
            "stop_reason": "end_turn"
        });

        let result = AnthropicClient::parse_response(&response);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no text content"));
    }

    #[tokio::test]
    #[cfg(feature = "live-test")]
    async fn anthropic_completion_basic() {
        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            eprintln!("skipping live test: ANTHROPIC_API_KEY not set");
            return;
        }

        let client = AnthropicClient::from_env().expect("client from env");
        let messages = vec![
            WireMessage::new("system", "Answer with a single short sentence."),
            WireMessage::new("user", "Say hello."),
        ];

        let result = client.complete(&messages).await;
        assert!(result.is_ok(), "live test failed: {:?}", result.err());
    }
}
