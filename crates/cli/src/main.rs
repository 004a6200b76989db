//! Physrag CLI
//!
//! Main entry point for the physrag command-line tool.
//! Answers physics questions from a pre-indexed paper corpus.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, IngestCommand, StatsCommand};
use physrag_core::{
    config::AppConfig,
    logging::{self, LogOptions},
    AppResult,
};
use std::path::PathBuf;

/// Physrag - grounded answers to physics questions from a paper corpus
#[derive(Parser, Debug)]
#[command(name = "physrag")]
#[command(about = "Grounded answers to physics questions from a paper corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PHYSRAG_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PHYSRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Corpus directory (passages.jsonl, index.sqlite, manifest.yaml)
    #[arg(long, global = true, env = "PHYSRAG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Completion provider (groq, openai, ollama)
    #[arg(short, long, global = true, env = "PHYSRAG_PROVIDER")]
    provider: Option<String>,

    /// Completion model identifier
    #[arg(short, long, global = true, env = "PHYSRAG_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one turn of questions
    Ask(AskCommand),

    /// Interactive session reading turns from stdin
    Chat(ChatCommand),

    /// Build the corpus from plain-text documents
    Ingest(IngestCommand),

    /// Show corpus statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Environment and YAML, then CLI overrides
    let mut config = AppConfig::load_from(cli.workspace, cli.config)?.with_overrides(
        cli.provider,
        cli.model,
        cli.data_dir,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    config.log_json |= cli.log_json;

    logging::init_logging(&LogOptions {
        level: config.log_level.as_deref(),
        no_color: config.no_color,
        json: config.log_json,
    })?;

    tracing::info!("Physrag CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Data dir: {:?}", config.data_dir());
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Ingest(_) => "ingest",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) if e.is_fatal() => tracing::error!("Startup failed: {}", e),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
