// ABOUTME: Completion provider adapters and the provider-name factory.
// ABOUTME: Resolves a provider name + optional model override into a configured Arc<dyn CompletionClient>.

pub mod anthropic;
pub mod azure;
pub mod openai;

use std::env;
use std::sync::Arc;

use crate::client::CompletionClient;

pub use anthropic::AnthropicClient;
pub use azure::AzureOpenAIClient;
pub use openai::OpenAIClient;

/// Read an env var and return `Some(value)` only if it is non-empty after trimming.
/// Prevents empty or whitespace-only values from producing invalid URLs or model names.
pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

/// Create a completion client for the given provider name.
///
/// Each adapter reads its own credentials from the environment. The model is
/// resolved from:
/// 1. The explicit `model` parameter (if Some)
/// 2. A provider-specific environment variable (e.g. `OPENAI_MODEL`)
/// 3. A sensible default for that provider
pub fn create_client(
    provider: &str,
    model: Option<&str>,
) -> Result<Arc<dyn CompletionClient>, anyhow::Error> {
    match provider {
        "openai" => {
            let mut client = OpenAIClient::from_env()?;
            if let Some(model) = model {
                client = client.with_model(model);
            }
            Ok(Arc::new(client))
        }
        "azure" => {
            let mut client = AzureOpenAIClient::from_env()?;
            if let Some(model) = model {
                client = client.with_model(model);
            }
            Ok(Arc::new(client))
        }
        "anthropic" => {
            let mut client = AnthropicClient::from_env()?;
            if let Some(model) = model {
                client = client.with_model(model);
            }
            Ok(Arc::new(client))
        }
        unknown => Err(anyhow::anyhow!("unsupported completion provider: {}", unknown)),
    }
}
