// ABOUTME: Agent layer for baton, wrapping completion endpoints behind named system-prompt agents.
// ABOUTME: Defines the CompletionClient boundary, provider adapters, and the sequential pipeline runner.

pub mod agent;
pub mod client;
pub mod pipeline;
pub mod providers;
pub mod testing;

pub use agent::Agent;
pub use client::{CompletionClient, CompletionError};
pub use pipeline::{PipelineError, PipelineRunner};
pub use providers::create_client;
