//! CLI entry point for the interaction network builder.
//!
//! Reads a JSON `NetworkRequest` from stdin and writes a JSON outcome to
//! stdout. Logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use interactome_archive::FileArchive;
use interactome_build::{BuildError, CancelToken, NetworkEngine, RunOutcome};
use interactome_core::config::InteractomeConfig;
use interactome_core::NetworkRequest;
use interactome_graph::{
    GraphClient, GraphConfig, GraphSnapshot, GraphSource, MemoryWriter, ResultWriter,
};

#[derive(Parser)]
#[command(name = "interactome-build")]
#[command(about = "Construct seed-anchored interaction networks")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Read the graph from a JSON snapshot instead of Neo4j.
    #[arg(long, global = true)]
    snapshot: Option<String>,

    /// Archive finished networks under this directory.
    #[arg(long, global = true)]
    archive_dir: Option<String>,

    /// Config file prefix (default: interactome).
    #[arg(short, long, default_value = "interactome", global = true)]
    config: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build and persist a network (reads request JSON from stdin).
    Build,
    /// Run validation only (reads request JSON from stdin).
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    let config = InteractomeConfig::load(&cli.config)?;

    let mut neo4j: Option<Arc<GraphClient>> = None;
    let source: Arc<dyn GraphSource> = match &cli.snapshot {
        Some(path) => Arc::new(GraphSnapshot::from_path(path)?),
        None => {
            let client = Arc::new(GraphClient::connect(&GraphConfig::from(&config.neo4j)).await?);
            neo4j = Some(client.clone());
            client
        }
    };

    let archive_dir = cli.archive_dir.clone().or(config.archive.dir.clone());
    let writer: Arc<dyn ResultWriter> = match (archive_dir, neo4j) {
        (Some(dir), _) => Arc::new(FileArchive::new(dir)?),
        (None, Some(client)) => client,
        (None, None) => {
            tracing::warn!("No archive directory and no Neo4j connection; results are not persisted");
            Arc::new(MemoryWriter::new())
        }
    };

    let engine = NetworkEngine::new(source, writer).with_settings(config.build.clone());

    let input = std::io::read_to_string(std::io::stdin())?;
    let mut request: NetworkRequest = serde_json::from_str(&input)?;

    match cli.command {
        Command::Validate => match engine.validate(&request).await {
            Ok(validated) => {
                let output = json!({
                    "valid": true,
                    "database_type": validated.database_type,
                    "mode": request.mode,
                });
                println!("{}", serde_json::to_string(&output)?);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                let output = json!({ "valid": false, "error": error_body(&e) });
                println!("{}", serde_json::to_string(&output)?);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Build => {
            let cancel = CancelToken::new();
            let handle = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    handle.cancel();
                }
            });

            let outcome = engine.run(&mut request, &cancel).await;
            let (output, code) = match &outcome {
                RunOutcome::Ready(report) => (
                    json!({ "status": "ready", "request": request, "report": report }),
                    ExitCode::SUCCESS,
                ),
                RunOutcome::Failed(e) => (
                    json!({ "status": "error", "request": request, "error": error_body(e) }),
                    ExitCode::FAILURE,
                ),
                RunOutcome::Cancelled(phase) => (
                    json!({ "status": "cancelled", "request": request, "phase": phase }),
                    ExitCode::from(130),
                ),
            };
            println!("{}", serde_json::to_string(&output)?);
            Ok(code)
        }
    }
}

fn error_body(error: &BuildError) -> serde_json::Value {
    json!({ "kind": error.kind(), "message": error.to_string() })
}
