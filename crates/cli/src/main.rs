//! `wflite`: Workflow Lite CLI.
//!
//! This binary is the composition root. It:
//!
//! 1. loads `.env` and reads [`config::AppConfig`] from the environment;
//! 2. installs the tracing subscriber (see [`telemetry`]);
//! 3. builds the provider, gateway, step registry, engine and run history and
//!    hands them to a [`WorkflowService`];
//! 4. dispatches the subcommand.
//!
//! Subcommands:
//!
//! - `wflite steps`: list the available steps.
//! - `wflite run --step <id>... [TEXT]`: run a workflow over text from the
//!   argument, `--file`, or stdin.
//! - `wflite history`: show the most recent runs.
//! - `wflite health`: check the history store and the model API.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use history::{InMemoryRunHistory, JsonFileRunHistory};
use llm::OpenAiCompatProvider;
use pipeline::{RunHistory, RunOutcome};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use workflow::{check_health, LlmGateway, StepRegistry, WorkflowEngine, WorkflowService};

mod config;
mod render;
mod telemetry;

use config::AppConfig;

/// Exit status of a run that stopped at a failed step.
const EXIT_HALTED: u8 = 2;

/// Run short multi-step LLM text workflows.
#[derive(Parser)]
#[command(name = "wflite", about = "Run short multi-step LLM text workflows", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print command output as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Keep run history in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available workflow steps.
    Steps,

    /// Run a workflow over a piece of text.
    Run(RunArgs),

    /// Show the most recent workflow runs.
    History,

    /// Check history storage and model API connectivity.
    Health,
}

#[derive(Args)]
struct RunArgs {
    /// Step id to run; repeat in execution order (2 to 4 steps).
    #[arg(short, long = "step", value_name = "ID", required = true)]
    steps: Vec<String>,

    /// Read the input text from a file.
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Input text. Read from stdin when neither TEXT nor --file is given.
    text: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let _telemetry = telemetry::init(
        telemetry::LogOptions {
            verbose: cli.verbose,
            json: cli.json_logs,
        },
        config.otlp_endpoint.as_deref(),
    )?;

    if !config.api_key_present {
        warn!(
            var = config::API_KEY_ENV,
            "API key is not set; model calls will fail with an authentication error"
        );
    }

    let service = build_service(&config, cli.no_history).await?;

    match cli.command {
        Commands::Steps => {
            let steps = service.available_steps();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                print!("{}", render::steps(&steps));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run(args) => run_workflow(&service, args, cli.json).await,
        Commands::History => {
            let runs = service
                .recent_runs()
                .await
                .context("failed to read run history")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&runs)?);
            } else {
                print!("{}", render::history(&runs));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let report = check_health(service.engine().gateway(), service.history()).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::health(&report));
            }
            Ok(if report.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

async fn build_service(config: &AppConfig, no_history: bool) -> anyhow::Result<WorkflowService> {
    let provider = OpenAiCompatProvider::new(config.provider.clone())
        .context("failed to build HTTP client")?;
    let gateway = LlmGateway::new(Arc::new(provider));
    let engine = WorkflowEngine::new(Arc::new(StepRegistry::builtin()), Arc::new(gateway));

    let history: Arc<dyn RunHistory> = if no_history {
        Arc::new(InMemoryRunHistory::new())
    } else {
        let history = JsonFileRunHistory::open(&config.history_path)
            .await
            .with_context(|| {
                format!(
                    "failed to open run history at {}",
                    config.history_path.display()
                )
            })?;
        Arc::new(history)
    };

    let history_kind = if no_history { "memory" } else { "file" };
    info!(
        provider = %config.provider.name,
        model = %config.provider.model,
        history = history_kind,
        "workflow service ready"
    );
    Ok(WorkflowService::new(engine, history))
}

async fn run_workflow(
    service: &WorkflowService,
    args: RunArgs,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let input = read_input(&args).await?;
    let request = service.validate(&input, &args.steps)?;
    let result = service.run(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::run(&result));
    }

    Ok(match result.outcome() {
        RunOutcome::Completed => ExitCode::SUCCESS,
        RunOutcome::Halted => ExitCode::from(EXIT_HALTED),
    })
}

async fn read_input(args: &RunArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read input file {}", path.display()));
    }
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read input from stdin")?;
    Ok(text)
}
