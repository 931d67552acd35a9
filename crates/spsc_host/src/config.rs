//! Benchmark configuration.
//!
//! Command-line arguments are parsed with clap and converted into a plain
//! [`BenchConfig`] that the driver receives explicitly. Nothing about a run
//! lives in process-wide state.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::Args;
use spsc_common::bench::{DEFAULT_ITEMS, DEFAULT_ITERATIONS, DEFAULT_WARMUP};
use spsc_common::variant::QueueKind;

use crate::error::BenchError;

/// Arguments of the `run` subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Items pushed and drained per iteration.
    #[arg(long, env = "SPSC_BENCH_ITEMS", default_value_t = DEFAULT_ITEMS)]
    pub items: usize,

    /// Queue capacity. Defaults to the item count, so the producer never waits.
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Timed iterations per variant.
    #[arg(long, env = "SPSC_BENCH_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Untimed iterations run before measuring.
    #[arg(long, default_value_t = DEFAULT_WARMUP)]
    pub warmup: usize,

    /// Seed for payload generation. Derived from the clock when omitted.
    #[arg(long, env = "SPSC_BENCH_SEED")]
    pub seed: Option<u64>,

    /// Variant to run; repeat to run several. Runs every variant when omitted.
    #[arg(long = "variant", value_parser = parse_kind)]
    pub variants: Vec<QueueKind>,

    /// Skip checking that values arrive in push order.
    #[arg(long)]
    pub no_verify: bool,
}

/// Everything the driver needs to know about one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub items: usize,
    pub capacity: usize,
    pub iterations: usize,
    pub warmup: usize,
    pub seed: u64,
    pub variants: Vec<QueueKind>,
    pub verify: bool,
}

impl BenchConfig {
    /// Checks that the run can make progress and measure something.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.items == 0 {
            return Err(BenchError::InvalidConfig("items must be at least 1".into()));
        }
        if self.iterations == 0 {
            return Err(BenchError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        if self.capacity == 0 {
            return Err(BenchError::InvalidConfig(
                "capacity must be at least 1".into(),
            ));
        }
        if self.variants.is_empty() {
            return Err(BenchError::InvalidConfig("no variants selected".into()));
        }
        Ok(())
    }
}

impl From<RunArgs> for BenchConfig {
    fn from(args: RunArgs) -> Self {
        let variants = if args.variants.is_empty() {
            QueueKind::ALL.to_vec()
        } else {
            let mut variants = args.variants;
            let mut seen = Vec::with_capacity(variants.len());
            variants.retain(|kind| {
                let first = !seen.contains(kind);
                seen.push(*kind);
                first
            });
            variants
        };

        Self {
            items: args.items,
            capacity: args.capacity.unwrap_or(args.items),
            iterations: args.iterations,
            warmup: args.warmup,
            seed: args.seed.unwrap_or_else(clock_seed),
            variants,
            verify: !args.no_verify,
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn parse_kind(name: &str) -> Result<QueueKind, String> {
    QueueKind::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = QueueKind::ALL.iter().map(|kind| kind.name()).collect();
        format!("unknown variant '{name}', expected one of: {}", known.join(", "))
    })
}
