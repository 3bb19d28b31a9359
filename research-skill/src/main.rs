use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use research_common::observability::{LogConfig, LogFormat, init_logging};
use research_skill::{Researcher, ResearchConfigLoader, default_config_path};
use std::path::PathBuf;

/// Search X (via bird), Reddit, or Brave and print the raw JSON response.
#[derive(Debug, Parser)]
#[command(name = "research", version, about)]
struct Cli {
    /// Config file (YAML/TOML/JSON). Defaults to the per-user research.yaml if present.
    #[arg(long, env = "RESEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Log encoding; overrides `logging.format`.
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Debug-level logs, mirrored to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search X/Twitter through the bird CLI.
    X { query: String },
    /// Search one Reddit community.
    Reddit { subreddit: String, query: String },
    /// Brave web search (token from BRAVE_API_KEY unless configured).
    Brave { query: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let mut loader = ResearchConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    } else if let Some(path) = default_config_path() {
        loader = loader.with_optional_file(path);
    }
    let cfg = loader.load().context("failed to load configuration")?;

    // 2) Logging
    let format = match cli.log_format {
        Some(f) => f,
        None => cfg
            .logging
            .format
            .parse::<LogFormat>()
            .map_err(anyhow::Error::msg)?,
    };
    init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr || cli.verbose,
        format,
        default_filter: if cli.verbose {
            "debug".to_string()
        } else {
            cfg.logging.filter.clone()
        },
        ..LogConfig::default()
    })?;

    // 3) Search
    let researcher = Researcher::from_config(&cfg)?;
    let value = match &cli.command {
        Command::X { query } => researcher.search_x(query).await,
        Command::Reddit { subreddit, query } => researcher.search_reddit(subreddit, query).await,
        Command::Brave { query } => researcher.search_brave(query).await,
    }
    .with_context(|| format!("{} search failed", cli.command.backend()))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

impl Command {
    fn backend(&self) -> &'static str {
        match self {
            Command::X { .. } => "x",
            Command::Reddit { .. } => "reddit",
            Command::Brave { .. } => "brave",
        }
    }
}
