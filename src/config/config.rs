use crate::{types::DigestType, utils::error::MinerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the miner
///
/// Every field has a default, so an empty file is a valid configuration.
/// Command-line arguments override whatever is loaded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of worker threads
    /// (default: number of CPU cores)
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Digest primitive to invert ("sha1" or "sha256")
    #[serde(default)]
    pub algorithm: DigestType,

    /// Nonces per work item handed to a worker
    /// (default: 110)
    #[serde(default = "default_range_size")]
    pub range_size: u64,

    /// Queued work items per worker; queue capacity is
    /// `worker_threads * queue_depth` (default: 5)
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Largest nonce to try; unset searches the whole 64-bit space
    #[serde(default)]
    pub max_nonce: Option<u64>,

    /// Seconds between throughput log lines (0 = off)
    #[serde(default)]
    pub report_interval_secs: u64,
}

fn default_worker_threads() -> usize {
    num_cpus::get()
}

fn default_range_size() -> u64 {
    110
}

fn default_queue_depth() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            worker_threads: default_worker_threads(),
            algorithm: DigestType::default(),
            range_size: default_range_size(),
            queue_depth: default_queue_depth(),
            max_nonce: None,
            report_interval_secs: 0,
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(MinerError)` - If file couldn't be read, parsed, or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the scheduler relies on
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.worker_threads == 0 {
            return Err(MinerError::ConfigError(
                "worker_threads must be at least 1".into(),
            ));
        }
        if self.range_size == 0 {
            return Err(MinerError::ConfigError(
                "range_size must be at least 1".into(),
            ));
        }
        if self.queue_depth == 0 {
            return Err(MinerError::ConfigError(
                "queue_depth must be at least 1".into(),
            ));
        }
        if self.max_nonce == Some(0) {
            return Err(MinerError::ConfigError(
                "max_nonce must be at least 1 (nonces start at 1)".into(),
            ));
        }
        Ok(())
    }

    /// Capacity of the bounded task queue
    pub fn queue_capacity(&self) -> usize {
        self.worker_threads.saturating_mul(self.queue_depth)
    }

    /// Generates a commented configuration template
    ///
    /// # Returns
    /// String containing a TOML template that [`Config::load`] accepts
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Hash inversion miner configuration\n\n");
        template.push_str("# Number of worker threads\n");
        template.push_str(&format!("worker_threads = {}\n", default_worker_threads()));
        template.push_str("# Supported digests: sha1, sha256\n");
        template.push_str("algorithm = \"sha1\"\n");
        template.push_str("# Nonces per work item\n");
        template.push_str(&format!("range_size = {}\n", default_range_size()));
        template.push_str("# Queued work items per worker\n");
        template.push_str(&format!("queue_depth = {}\n", default_queue_depth()));
        template.push_str("# Largest nonce to try (omit to search all 64-bit nonces)\n");
        template.push_str("# max_nonce = 100000000\n");
        template.push_str("# Seconds between throughput log lines (0 = off)\n");
        template.push_str("report_interval_secs = 0\n");
        template
    }
}
