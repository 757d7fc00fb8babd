use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chatter_common::observability::{LogConfig, LogFormat, init_logging};
use chatter_config::{ChatterConfig, ChatterConfigLoader, DEFAULT_CONFIG_FILE, LoggingConfig};
use chatter_pipeline::Pipeline;
use clap::{Parser, Subcommand};

mod ask;
mod report;

#[derive(Parser)]
#[command(name = "chatter")]
#[command(about = "Summarize what Reddit and Twitter are saying about a topic")]
#[command(version)]
struct Cli {
    /// Configuration file (YAML). Defaults to ./chatter.yaml when present.
    #[arg(short, long, global = true, env = "CHATTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, print and summarize content for one topic
    Ask(ask::AskArgs),

    /// Run the HTTP service (JSON endpoint and web form)
    Serve {
        /// Address to bind, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    let log_path = init_logging(log_config(&cfg.logging)?)?;
    tracing::debug!(path = %log_path.display(), "logging initialised");

    let pipeline = Pipeline::from_config(&cfg).context("failed to build pipeline")?;

    match cli.command {
        Commands::Ask(args) => ask::run(&pipeline, args).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            chatter_server::bind_and_serve(&bind, Arc::new(pipeline)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ChatterConfig> {
    let loader = match path {
        Some(p) => ChatterConfigLoader::new().with_file(p),
        None => ChatterConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

fn log_config(logging: &LoggingConfig) -> Result<LogConfig> {
    let format: LogFormat = logging.format.parse().map_err(anyhow::Error::msg)?;
    Ok(LogConfig {
        app_name: "chatter",
        log_dir: logging.dir.as_ref().map(PathBuf::from),
        emit_stderr: logging.stderr,
        format,
        default_filter: logging.filter.clone(),
    })
}
