//! Inversion Miner - parallel brute-force hash inversion in Rust
//!
//! Given a block of data and a difficulty (required leading zero bits), the
//! miner searches the 64-bit nonce space for a value whose digest of
//! `block ‖ decimal(nonce)` satisfies the difficulty. The search is split
//! across a fixed pool of worker threads fed through a bounded task queue:
//! - The calling thread produces fixed-size nonce ranges
//! - Workers scan ranges and publish the first satisfying nonce
//! - The first published solution drains the queue; smaller nonces found
//!   before shutdown replace it

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Miner core: digests, evaluator, queue, workers and producer
pub mod miner;

/// Statistics collection and reporting functionality
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{
    Algorithm, DifficultyMask, DigestBytes, MiningJob, MiningOutcome, NonceRange, Scheduler,
    Solution, TaskQueue, Worker,
};
pub use stats::{MiningStats, SolutionReport, StatsReporter};
pub use types::DigestType;
pub use utils::{MinerError, init_logging};
