// ABOUTME: Message types for the shared conversation history.
// ABOUTME: Defines Role, the immutable Message record, and the wire shape sent to completion endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Who is speaking in a message.
///
/// `System`, `User`, and `Response` map onto chat-completion wire roles.
/// `Runner` is bookkeeping emitted by the pipeline itself and never
/// crosses the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Response,
    Runner,
}

impl Role {
    /// Human-readable label for display and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Response => "response",
            Role::Runner => "runner",
        }
    }

    /// The role string used on the completion wire, or `None` for
    /// bookkeeping roles that are filtered out before serialization.
    pub fn wire_name(&self) -> Option<&'static str> {
        match self {
            Role::System => Some("system"),
            Role::User => Some("user"),
            Role::Response => Some("assistant"),
            Role::Runner => None,
        }
    }

    /// Parse a wire role string back into a `Role`.
    pub fn from_wire(name: &str) -> Option<Role> {
        match name {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Response),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entry in the conversation history. Immutable once constructed.
///
/// `agent` records who produced the message, including the synthetic
/// identities `"user"` (the seeded task) and `"runner"` (the terminal
/// marker appended by the pipeline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: Ulid,
    pub agent: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with a fresh id and the current time.
    pub fn new(agent: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            message_id: Ulid::new(),
            agent: agent.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// The wire form of this message, or `None` for bookkeeping roles.
    pub fn to_wire(&self) -> Option<WireMessage> {
        self.role.wire_name().map(|role| WireMessage {
            role: role.to_string(),
            content: self.content.clone(),
        })
    }
}

/// The `{role, content}` pair that chat-completion endpoints consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}
