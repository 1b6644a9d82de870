// ABOUTME: Built-in pipeline presets for the baton CLI.
// ABOUTME: Maps a preset name to its agents, system prompts, default task, and the static KQL schema catalog.

use std::sync::Arc;

use clap::ValueEnum;

use baton_agent::{Agent, CompletionClient, PipelineError, PipelineRunner};

/// System prompt for the document author agent.
const WRITER_SYSTEM_PROMPT: &str = "You are an AI technical document author. Write a concise \
    document. When revising, write the full document with the revisions applied.";

/// System prompt for the document reviewer agent.
const REVIEWER_SYSTEM_PROMPT: &str = "You are an AI technical document reviewer. Make sure the \
    document covers edge scenarios where appropriate for the topic. Respond with 'APPROVE' once \
    your feedback has been addressed.";

/// System prompt for the knock-knock comedian.
const KNOCK_KNOCK_SYSTEM_PROMPT: &str = "You are a funny comedian that tells knock knock jokes. \
    Make sure the joke is funny and has a punchline.";

/// System prompt for the crossing-the-road comedian.
const CROSS_THE_ROAD_SYSTEM_PROMPT: &str = "You are a funny comedian that tells \
    chicken-crossing-the-road jokes. Make sure the joke is funny and has a punchline.";

/// System prompt for the schema agent. The static catalog is appended at
/// assembly time so no tool round-trip is needed.
const SCHEMA_SYSTEM_PROMPT: &str = "You are an AI that knows the KQL table schemas listed below. \
    Ground every downstream step in these schemas.";

/// System prompt for the query classifier agent.
const CLASSIFIER_SYSTEM_PROMPT: &str = "You are an AI that classifies the type of a KQL query. \
    Use the provided schema and the following labels to classify the requested query:\n\n\
    single-table: A query in one cluster for a single table.\n\
    multi-table single-cluster: A query that may span multiple tables in one cluster and may \
    include joins.\n\
    multi-table multi-cluster: A query that may span multiple tables and multiple clusters and \
    may include joins.\n\
    unknown: A query that cannot be classified.\n\n\
    Output:\n\
    Query classification: <classification>";

/// System prompt for the example generator agent.
const EXAMPLE_SYSTEM_PROMPT: &str = "You are an AI that produces a KQL example matching a \
    classification label.\n\n\
    If the classification is 'single-table', the example is:\n\
    `events | where ts>ago(24h)`\n\n\
    If the classification is 'multi-table single-cluster', the example is:\n\
    `events | join kind=inner (users) on $left.userid == $right.userid | where ts>ago(24h)`\n\n\
    If the classification is 'multi-table multi-cluster', the example is:\n\
    `cluster('master.contoso.com').database('services').systems | join kind=inner \
    (cluster('loggingevents.contoso.com').database('logs').events) on $left.systemid == \
    $right.systemid | where ts>ago(24h)`\n\n\
    Output format:\n\
    Query sample: <query example>";

/// System prompt for the final query generator agent.
const QUERY_GENERATOR_SYSTEM_PROMPT: &str = "You are an AI that generates a KQL query based on \
    the user's request, the schema, and the sample provided.";

/// Tables the schema agent knows about.
const SCHEMA_TABLES: &[&str] = &["events", "users", "system"];

/// Built-in pipeline presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PipelineKind {
    /// Document author and reviewer trading a draft.
    WriterReviewer,
    /// Two comedians riffing on a joke.
    Comedians,
    /// Schema, classification, example, and query generation for KQL.
    Kql,
}

impl PipelineKind {
    /// Task used when none is given on the command line. Each preset keeps
    /// the task its demo shipped with.
    pub fn default_task(&self) -> &'static str {
        match self {
            PipelineKind::WriterReviewer => "Write a technical document about prompt engineering.",
            PipelineKind::Comedians => "tell me a joke",
            PipelineKind::Kql => "Find all the infra events in the last 1 hour",
        }
    }
}

/// Static schema lookup for the KQL preset. Stands in for a live catalog.
pub fn table_schema(name: &str) -> Option<&'static str> {
    match name {
        "events" => Some(
            "table: events\n\
             cluster: loggingevents.contoso.com\n\
             database: logs\n\
             fields: id (string), userid (string), ts (timestamp), event (string), \
             systemid (string), type (string)\n\
             description: login events; types: infra, code, app, security, change",
        ),
        "users" => Some(
            "table: users\n\
             cluster: loggingevents.contoso.com\n\
             database: logs\n\
             fields: userid (string), name (string)\n\
             description: user information",
        ),
        "system" => Some(
            "table: systems\n\
             cluster: master.contoso.com\n\
             database: services\n\
             fields: systemid (string), name (string), ha (boolean)\n\
             description: system information",
        ),
        _ => None,
    }
}

fn schema_catalog() -> String {
    SCHEMA_TABLES
        .iter()
        .filter_map(|name| table_schema(name))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Assemble the runner for a preset, with every agent speaking through the
/// same completion client.
pub fn build(
    kind: PipelineKind,
    client: Arc<dyn CompletionClient>,
) -> Result<PipelineRunner, PipelineError> {
    let mut runner = PipelineRunner::new();
    match kind {
        PipelineKind::WriterReviewer => {
            runner.register(
                Agent::new("doc_author", Arc::clone(&client))
                    .with_system_prompt(WRITER_SYSTEM_PROMPT),
            )?;
            runner.register(
                Agent::new("doc_reviewer", Arc::clone(&client))
                    .with_system_prompt(REVIEWER_SYSTEM_PROMPT),
            )?;
        }
        PipelineKind::Comedians => {
            runner.register(
                Agent::new("knock_knock", Arc::clone(&client))
                    .with_system_prompt(KNOCK_KNOCK_SYSTEM_PROMPT),
            )?;
            runner.register(
                Agent::new("cross_the_road", Arc::clone(&client))
                    .with_system_prompt(CROSS_THE_ROAD_SYSTEM_PROMPT),
            )?;
        }
        PipelineKind::Kql => {
            let schema_prompt = format!("{}\n\n{}", SCHEMA_SYSTEM_PROMPT, schema_catalog());
            runner.register(
                Agent::new("get_schema", Arc::clone(&client)).with_system_prompt(schema_prompt),
            )?;
            runner.register(
                Agent::new("query_classifier", Arc::clone(&client))
                    .with_system_prompt(CLASSIFIER_SYSTEM_PROMPT),
            )?;
            runner.register(
                Agent::new("example_generator", Arc::clone(&client))
                    .with_system_prompt(EXAMPLE_SYSTEM_PROMPT),
            )?;
            runner.register(
                Agent::new("query_generator", Arc::clone(&client))
                    .with_system_prompt(QUERY_GENERATOR_SYSTEM_PROMPT),
            )?;
        }
    }
    Ok(runner)
}
