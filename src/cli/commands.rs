use crate::types::DigestType;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parallel hash inversion miner
///
/// Searches for a nonce such that digest(block ‖ nonce) starts with the
/// requested number of zero bits.
#[derive(Parser, Debug)]
#[command(name = "inversion-miner")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Commands {
    /// Optional non-mining action
    #[command(subcommand)]
    pub action: Option<Action>,

    /// Mining arguments (the default action)
    #[command(flatten)]
    pub mine: MineOptions,
}

/// Secondary commands
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Measure raw hashing throughput
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for a mining run
#[derive(Args, Debug, Default)]
pub struct MineOptions {
    /// Number of worker threads
    #[arg(value_name = "THREADS")]
    pub threads: Option<usize>,

    /// Required leading zero bits of the digest (0-32)
    #[arg(value_name = "LEADING_ZERO_BITS")]
    pub leading_zeros: Option<u32>,

    /// Block data the nonce is appended to
    #[arg(value_name = "BLOCK_DATA")]
    pub block_data: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Digest primitive (overrides config)
    #[arg(short, long)]
    pub algorithm: Option<DigestType>,

    /// Nonces per work item (overrides config)
    #[arg(long)]
    pub range_size: Option<u64>,

    /// Largest nonce to try (overrides config)
    #[arg(long)]
    pub max_nonce: Option<u64>,

    /// Seconds between throughput log lines, 0 = off (overrides config)
    #[arg(long)]
    pub report_interval: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Options for running benchmarks
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Digest primitive to benchmark
    #[arg(short, long, default_value_t = DigestType::Sha1)]
    pub algorithm: DigestType,

    /// Duration of benchmark in seconds
    #[arg(short, long, default_value_t = 5)]
    pub duration: u64,

    /// Number of threads to use
    #[arg(short, long, default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Block data to hash
    #[arg(short, long, default_value = "benchmark")]
    pub block: String,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "miner.toml")]
    pub output: PathBuf,
}
