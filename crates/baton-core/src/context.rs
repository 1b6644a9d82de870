// ABOUTME: The shared conversation context threaded through a pipeline run.
// ABOUTME: Owns message ordering, the leading-system rotation rule, and wire serialization.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role, WireMessage};

/// Ordered conversation history shared by every agent in a pipeline run.
///
/// A context is owned by exactly one party at a time: each processing step
/// consumes it by value and returns the updated value, so histories are
/// never aliased mid-run. At most one `System` message exists at any point,
/// and only ever at position 0; everything below the head is append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    messages: Vec<Message>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with the user's task as its first message.
    pub fn seeded(task: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new("user", Role::User, task)],
        }
    }

    /// Append a message to the end of the history.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Hand the system slot to `agent`.
    ///
    /// Removes the system message at position 0 if one is present, then
    /// inserts a freshly stamped system message for `agent` when `prompt`
    /// is `Some`. Messages at positions >= 1 are never touched.
    pub fn rotate_system(&mut self, agent: &str, prompt: Option<&str>) {
        if matches!(self.messages.first(), Some(m) if m.role == Role::System) {
            self.messages.remove(0);
        }
        if let Some(prompt) = prompt {
            self.messages
                .insert(0, Message::new(agent, Role::System, prompt));
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume the context into its messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Serialize to the ordered wire form, dropping bookkeeping roles.
    ///
    /// Relative order of the surviving messages is preserved exactly.
    pub fn wire_messages(&self) -> Vec<WireMessage> {
        self.messages.iter().filter_map(Message::to_wire).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn tail_ids(context: &Context) -> Vec<Ulid> {
        context
            .messages()
            .iter()
            .skip(1)
            .map(|m| m.message_id)
            .collect()
    }

    #[test]
    fn seeded_context_has_single_user_message() {
        let ctx = Context::seeded("Write a haiku about rivers.");

        assert_eq!(ctx.len(), 1);
        let msg = &ctx.messages()[0];
        assert_eq!(msg.agent, "user");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Write a haiku about rivers.");
    }

    #[test]
    fn push_appends_in_order() {
        let mut ctx = Context::seeded("task");
        ctx.push(Message::new("writer", Role::Response, "first"));
        ctx.push(Message::new("reviewer", Role::Response, "second"));

        let contents: Vec<&str> = ctx.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["task", "first", "second"]);
    }

    #[test]
    fn rotate_inserts_system_at_head() {
        let mut ctx = Context::seeded("task");
        ctx.rotate_system("writer", Some("You write documents."));

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.messages()[0].role, Role::System);
        assert_eq!(ctx.messages()[0].agent, "writer");
        assert_eq!(ctx.messages()[0].content, "You write documents.");
        assert_eq!(ctx.messages()[1].role, Role::User);
    }

    #[test]
    fn rotate_replaces_predecessor_system() {
        let mut ctx = Context::seeded("task");
        ctx.rotate_system("writer", Some("You write documents."));
        ctx.push(Message::new("writer", Role::Response, "a draft"));
        let tail_before = tail_ids(&ctx);

        ctx.rotate_system("reviewer", Some("You review documents."));

        let systems: Vec<&Message> = ctx.iter().filter(|m| m.role == Role::System).collect();
        assert_eq!(systems.len(), 1);
        assert_eq!(ctx.messages()[0].agent, "reviewer");
        assert_eq!(ctx.messages()[0].content, "You review documents.");
        assert_eq!(tail_ids(&ctx), tail_before, "tail must be untouched");
    }

    #[test]
    fn rotate_without_prompt_clears_system_slot() {
        let mut ctx = Context::seeded("task");
        ctx.rotate_system("writer", Some("You write documents."));
        ctx.rotate_system("relay", None);

        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.messages()[0].role, Role::User);
    }

    #[test]
    fn rotate_on_empty_context_inserts_only() {
        let mut ctx = Context::new();
        ctx.rotate_system("writer", Some("You write documents."));

        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.messages()[0].role, Role::System);
    }

    #[test]
    fn rotate_never_removes_below_head() {
        // A system message can only ever live at position 0, but make sure
        // rotation does not scan deeper even if the head is not system.
        let mut ctx = Context::seeded("task");
        ctx.push(Message::new("writer", Role::Response, "a draft"));
        let ids_before: Vec<Ulid> = ctx.iter().map(|m| m.message_id).collect();

        ctx.rotate_system("reviewer", Some("You review documents."));

        let ids_after: Vec<Ulid> = ctx.iter().skip(1).map(|m| m.message_id).collect();
        assert_eq!(ids_after, ids_before, "pre-existing messages must survive");
    }

    #[test]
    fn wire_messages_filters_runner() {
        let mut ctx = Context::seeded("task");
        ctx.push(Message::new("writer", Role::Response, "a draft"));
        ctx.push(Message::new("runner", Role::Runner, "Done"));

        let wire = ctx.wire_messages();
        assert_eq!(wire.len(), 2);
        assert!(wire.iter().all(|w| w.role != "runner"));
    }

    #[test]
    fn wire_messages_preserve_order_and_map_roles() {
        let mut ctx = Context::new();
        ctx.rotate_system("writer", Some("You write documents."));
        ctx.push(Message::new("user", Role::User, "the task"));
        ctx.push(Message::new("writer", Role::Response, "the draft"));

        let wire = ctx.wire_messages();
        let pairs: Vec<(&str, &str)> = wire
            .iter()
            .map(|w| (w.role.as_str(), w.content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("system", "You write documents."),
                ("user", "the task"),
                ("assistant", "the draft"),
            ]
        );
    }

    #[test]
    fn empty_context_has_no_wire_messages() {
        assert!(Context::new().wire_messages().is_empty());
        assert!(Context::new().is_empty());
    }

    #[test]
    fn context_serde_round_trip() {
        let mut ctx = Context::seeded("task");
        ctx.push(Message::new("writer", Role::Response, "a draft"));

        let json = serde_json::to_string(&ctx).expect("serialize context");
        let back: Context = serde_json::from_str(&json).expect("deserialize context");

        assert_eq!(back.len(), ctx.len());
        assert_eq!(back.messages()[1].content, "a draft");
    }
}
