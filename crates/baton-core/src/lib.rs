// ABOUTME: Core library for baton, containing the conversation data model.
// ABOUTME: This crate defines the message types and shared context used across all baton components.

pub mod context;
pub mod message;

pub use context::Context;
pub use message::{Message, Role, WireMessage};
