//! `simkern`: capability report, one-shot evaluation and kernel cross-checks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simkern_core::{DispatchConfig, Metric};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod operands;

/// Inspect and exercise the per-ISA distance kernels
#[derive(Parser, Debug)]
#[command(name = "simkern")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dispatch configuration file (TOML); defaults to ./simkern.toml if present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show detected instruction sets and the kernel each metric resolves to
    Caps {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute one distance
    ///
    /// Binary metrics take hex strings (`ff00a5`); int8 metrics take
    /// comma-separated integers (`1,-2,3`).
    Eval {
        /// Metric name (hamming, jaccard, sqeuclidean, cosine, inner)
        #[arg(short, long)]
        metric: Metric,

        /// First operand
        #[arg(allow_hyphen_values = true)]
        a: String,

        /// Second operand
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    /// Compare every available kernel against the scalar reference
    Check {
        /// Only check this metric
        #[arg(short, long)]
        metric: Option<Metric>,

        /// Element counts to test
        #[arg(long, value_delimiter = ',', default_values_t = commands::DEFAULT_CHECK_DIMS)]
        dims: Vec<usize>,

        /// Random operand pairs per dimension
        #[arg(long, default_value_t = 32)]
        trials: usize,

        /// RNG seed
        #[arg(long, default_value_t = 0x5eed)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays machine-readable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DispatchConfig::load_from(path)?,
        None => DispatchConfig::load()?,
    };

    match cli.command {
        Command::Caps { json } => commands::caps(&config, json),
        Command::Eval { metric, a, b } => commands::eval(&config, metric, &a, &b),
        Command::Check {
            metric,
            dims,
            trials,
            seed,
        } => commands::check(&config, metric, &dims, trials, seed),
    }
}
