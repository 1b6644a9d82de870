// ABOUTME: Defines the CompletionClient trait that all provider adapters must implement.
// ABOUTME: Also defines CompletionError, the taxonomy of completion-call failures.

use async_trait::async_trait;

use baton_core::WireMessage;

/// Errors that can occur during a completion call.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,
}

/// Trait that all completion provider adapters must implement. Each provider
/// (OpenAI, Azure OpenAI, Anthropic, etc.) translates the ordered wire
/// messages into an API call and extracts the generated text.
///
/// Callers never see provider-specific payloads; one call in, one string out.
/// Retry policy belongs to callers, not implementations.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run a single completion over the given messages and return the
    /// generated text.
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, CompletionError>;

    /// Provider name for logging and display (e.g. "anthropic", "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier being used (e.g. "gpt-4o").
    fn model_name(&self) -> &str;
}
