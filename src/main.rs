// ABOUTME: Entry point for the baton binary.
// ABOUTME: Parses CLI arguments, initializes tracing, assembles the chosen pipeline, and renders the run.

mod pipelines;
mod render;

use clap::Parser;

use pipelines::PipelineKind;

/// Run a sequential multi-agent pipeline over a single task.
#[derive(Parser, Debug)]
#[command(name = "baton", version, about)]
struct Cli {
    /// Task for the pipeline. Defaults to the chosen preset's demo task.
    #[arg(trailing_var_arg = true)]
    task: Vec<String>,

    /// Pipeline preset to run.
    #[arg(
        long,
        value_enum,
        env = "BATON_PIPELINE",
        default_value = "writer-reviewer"
    )]
    pipeline: PipelineKind,

    /// Completion provider: openai, azure, or anthropic.
    #[arg(long, env = "BATON_DEFAULT_PROVIDER", default_value = "openai")]
    provider: String,

    /// Model override for the chosen provider.
    #[arg(long, env = "BATON_DEFAULT_MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "baton=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let task = if cli.task.is_empty() {
        cli.pipeline.default_task().to_string()
    } else {
        cli.task.join(" ")
    };

    let client = baton_agent::create_client(&cli.provider, cli.model.as_deref())?;
    tracing::info!(
        provider = client.provider_name(),
        model = client.model_name(),
        pipeline = ?cli.pipeline,
        "starting pipeline run"
    );

    let runner = pipelines::build(cli.pipeline, client)?;
    let context = runner.process(&task).await?;

    println!("{}", render::render_transcript(&context));
    Ok(())
}
