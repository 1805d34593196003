// src/utils/error.rs
use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Main error type for the miner
///
/// A search that ends without a solution is not an error; it is reported
/// through [`crate::miner::MiningOutcome`].
#[derive(Error, Debug)]
pub enum MinerError {
    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Task queue storage could not be allocated
    #[error("Allocation failed: {0}")]
    AllocationError(String),

    /// A worker thread panicked
    #[error("Task execution error: {0}")]
    TaskError(String),

    /// Standard I/O operation errors (config files, thread spawning)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Converts TOML parse failures into MinerError
///
/// Wraps the original error in a `ConfigError` variant with context.
impl From<toml::de::Error> for MinerError {
    fn from(e: toml::de::Error) -> Self {
        MinerError::ConfigError(format!("Invalid config format: {}", e))
    }
}

/// Converts failed storage reservations into MinerError
impl From<TryReserveError> for MinerError {
    fn from(e: TryReserveError) -> Self {
        MinerError::AllocationError(format!("task queue storage: {}", e))
    }
}
