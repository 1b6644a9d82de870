// ABOUTME: PipelineRunner chains registered agents over one shared conversation context.
// ABOUTME: Seeds the task, hands the context from agent to agent in order, and appends the terminal marker.

use tracing::{debug, info};

use baton_core::{Context, Message, Role};

use crate::agent::Agent;
use crate::client::CompletionError;

/// Synthetic agent identity for messages the pipeline emits itself.
const RUNNER_AGENT: &str = "runner";

/// Content of the terminal marker appended after the last agent's turn.
const RUNNER_DONE: &str = "Done";

/// Errors that can occur while assembling or running a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("duplicate agent name: {0}")]
    DuplicateAgentName(String),

    #[error("agent '{agent}' failed: {source}")]
    AgentTurn {
        agent: String,
        #[source]
        source: CompletionError,
    },
}

/// Runs registered agents in order over a single shared context.
///
/// Registration order is execution order. A run seeds the context with the
/// task, threads it through every agent's `process`, then appends a
/// `Runner`-role marker so consumers can tell a completed transcript from
/// a truncated one. The runner itself is immutable during runs, so one
/// runner can serve overlapping runs that share nothing but the clients.
#[derive(Default)]
pub struct PipelineRunner {
    agents: Vec<Agent>,
}

impl PipelineRunner {
    /// Create a runner with no agents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent at the end of the execution order.
    ///
    /// Names identify agents in transcripts and error attribution, so they
    /// must be unique within a runner.
    pub fn register(&mut self, agent: Agent) -> Result<(), PipelineError> {
        if self.agents.iter().any(|a| a.name() == agent.name()) {
            return Err(PipelineError::DuplicateAgentName(agent.name().to_string()));
        }
        debug!(agent = %agent.name(), position = self.agents.len(), "agent registered");
        self.agents.push(agent);
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Registered agent names in execution order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(Agent::name).collect()
    }

    /// Run the pipeline over `task`.
    ///
    /// An empty task is a no-op: no agent runs, no completion call is made,
    /// and the returned context is empty. Otherwise the task is seeded as
    /// the first user message and no further task argument is passed to any
    /// agent; the seed already encodes it.
    ///
    /// The first failing turn aborts the run. The error names the agent
    /// whose turn failed and wraps the completion failure underneath.
    pub async fn process(&self, task: &str) -> Result<Context, PipelineError> {
        if task.is_empty() {
            debug!("empty task, skipping run");
            return Ok(Context::new());
        }

        info!(agents = self.agents.len(), "pipeline run started");

        let mut context = Context::seeded(task);
        for agent in &self.agents {
            context = agent.process(context, None).await.map_err(|source| {
                PipelineError::AgentTurn {
                    agent: agent.name().to_string(),
                    source,
                }
            })?;
        }

        context.push(Message::new(RUNNER_AGENT, Role::Runner, RUNNER_DONE));
        info!(messages = context.len(), "pipeline run finished");
        Ok(context)
    }
}
