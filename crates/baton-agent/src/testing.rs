// ABOUTME: Test utilities for baton-agent, including scripted and failing completion clients.
// ABOUTME: Used in tests to simulate completion endpoints without real API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use baton_core::WireMessage;

use crate::client::{CompletionClient, CompletionError};

/// A completion client that replays a fixed script of responses.
///
/// Each `complete` call pops the next scripted response and records the
/// wire messages it was handed, so tests can assert both what an agent sent
/// and what it did with the reply. When the script runs dry the client
/// fails, which catches pipelines making more calls than the test expects.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<WireMessage>>>,
}

impl ScriptedClient {
    /// Create a client that replays the given responses in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a client with a single scripted response.
    ///
    /// Convenience constructor for one-agent tests that just need a turn to
    /// complete.
    pub fn single(text: &str) -> Self {
        Self::new([text])
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of the wire messages from each call, in call order.
    pub fn recorded_calls(&self) -> Vec<Vec<WireMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[WireMessage]) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CompletionError::ProviderError("script exhausted".to_string()))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// A completion client that fails every call with a provider error.
pub struct FailingClient {
    message: String,
}

impl FailingClient {
    /// Create a client that always fails with the given error message.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _messages: &[WireMessage]) -> Result<String, CompletionError> {
        Err(CompletionError::ProviderError(self.message.clone()))
    }

    fn provider_name(&self) -> &str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "failing-model"
    }
}
