// src/utils/mod.rs
//! Error handling and logging infrastructure

/// Error types and conversions
///
/// Contains the [`MinerError`] enum which defines every failure the miner
/// can report.
pub mod error;

/// Logging setup on top of `env_logger`
pub mod logging;

// Re-export for easier access
pub use error::MinerError;
pub use logging::{init_bench_logging, init_logging};
