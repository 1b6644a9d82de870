// ABOUTME: ANSI-colored transcript rendering for the baton CLI.
// ABOUTME: One line per message, color-coded by agent identity.

use std::collections::HashMap;

use baton_core::{Context, Message, Role};

pub const RESET: &str = "\x1b[0m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const MAGENTA: &str = "\x1b[35m";
pub const BLUE: &str = "\x1b[34m";

/// Colors handed out to agents in order of first appearance in the
/// transcript. The seed and the terminal marker have fixed colors instead.
const AGENT_PALETTE: &[&str] = &[GREEN, YELLOW, MAGENTA, BLUE];

/// Format one message as a single colored line: `agent [role]: content`.
pub fn format_message(message: &Message, color: &str) -> String {
    format!(
        "{}{} [{}]: {}{}",
        color, message.agent, message.role, message.content, RESET
    )
}

/// Render a full transcript, one line per message.
pub fn render_transcript(context: &Context) -> String {
    let assigned = agent_colors(context);
    context
        .iter()
        .map(|m| format_message(m, color_for(m, &assigned)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn color_for(message: &Message, assigned: &HashMap<&str, &'static str>) -> &'static str {
    match message.role {
        Role::User => CYAN,
        Role::Runner => DIM,
        _ => assigned
            .get(message.agent.as_str())
            .copied()
            .unwrap_or(GREEN),
    }
}

fn agent_colors<'a>(context: &'a Context) -> HashMap<&'a str, &'static str> {
    let mut assigned = HashMap::new();
    let mut next = 0;
    for message in context.iter() {
        if matches!(message.role, Role::User | Role::Runner) {
            continue;
        }
        if !assigned.contains_key(message.agent.as_str()) {
            assigned.insert(
                message.agent.as_str(),
                AGENT_PALETTE[next % AGENT_PALETTE.len()],
            );
            next += 1;
        }
    }
    assigned
}
