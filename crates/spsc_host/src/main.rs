mod config;
mod driver;
mod error;
mod payload;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spsc_common::layout::CACHE_LINE;
use spsc_common::variant::QueueKind;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{BenchConfig, RunArgs};

#[derive(Debug, Parser)]
#[command(name = "spsc-bench", about = "Throughput of bounded SPSC queue variants")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Push and drain a payload through each selected variant and report throughput.
    Run(RunArgs),
    /// List the available queue variants.
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Run(args) => run(BenchConfig::from(args))?,
        Commands::List => list(),
    }
    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run(config: BenchConfig) -> Result<()> {
    config.validate()?;
    info!(
        items = config.items,
        capacity = config.capacity,
        iterations = config.iterations,
        warmup = config.warmup,
        seed = config.seed,
        verify = config.verify,
        cache_line = CACHE_LINE,
        "benchmark configuration"
    );

    let payload = payload::generate(config.items, config.seed);
    let reports = driver::run_all(&config, &payload).context("benchmark run failed")?;
    stats::print_report(&reports);
    Ok(())
}

fn list() {
    for kind in QueueKind::ALL {
        let marker = if kind.is_known_discrepancy() { " (known discrepancy)" } else { "" };
        println!("{:<14} {}{}", kind.name(), kind.summary(), marker);
    }
}
