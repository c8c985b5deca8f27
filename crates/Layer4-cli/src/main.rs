//! Taskflow CLI - Main entry point

mod cli;

use clap::Parser;
use taskflow_foundation::TaskflowConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Taskflow - run a batch of tasks through their lifecycle
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Task names to run (defaults to two sample tasks)
    tasks: Vec<String>,

    /// Worker count recorded by the manager
    #[arg(long)]
    max_workers: Option<usize>,

    /// Simulated work per task in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the resulting tasks as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = TaskflowConfig::load()?;
    let options = cli::RunOptions::from_args(args.tasks, args.max_workers, args.delay_ms, args.json);

    cli::run(config, options).await
}
