// ABOUTME: A named agent wrapping a system prompt and a completion client.
// ABOUTME: Each process() turn rotates the system slot, runs one completion, and appends the reply.

use std::sync::Arc;

use tracing::debug;

use baton_core::{Context, Message, Role};

use crate::client::{CompletionClient, CompletionError};

/// A single pipeline participant: a name, an optional system prompt, and a
/// handle to the completion endpoint it speaks through.
///
/// Agents hold no conversation state of their own. Everything they know
/// arrives in the `Context` they are handed and leaves in the one they
/// return, so the same agent can serve any number of runs.
pub struct Agent {
    name: String,
    system_prompt: Option<String>,
    client: Arc<dyn CompletionClient>,
}

impl Agent {
    /// Create an agent with no system prompt.
    pub fn new(name: impl Into<String>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            name: name.into(),
            system_prompt: None,
            client,
        }
    }

    /// Set the system prompt. Empty prompts are treated as absent.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = if prompt.is_empty() { None } else { Some(prompt) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Run one turn over the given context.
    ///
    /// Claims the system slot (displacing a predecessor's directive), injects
    /// `task` as a user message when present and non-empty, runs a single
    /// completion over the wire form, and appends the reply as a `Response`
    /// message attributed to this agent.
    ///
    /// Takes the context by value and returns the updated value; on failure
    /// the context is dropped with the error. Completion calls are never
    /// retried here.
    pub async fn process(
        &self,
        mut context: Context,
        task: Option<&str>,
    ) -> Result<Context, CompletionError> {
        context.rotate_system(&self.name, self.system_prompt.as_deref());

        if let Some(task) = task
            && !task.is_empty()
        {
            context.push(Message::new(&self.name, Role::User, task));
        }

        let wire = context.wire_messages();
        debug!(
            agent = %self.name,
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            messages = wire.len(),
            "running completion turn"
        );

        let reply = self.client.complete(&wire).await?;
        debug!(agent = %self.name, chars = reply.len(), "completion turn finished");

        context.push(Message::new(&self.name, Role::Response, reply));
        Ok(context)
    }
}
