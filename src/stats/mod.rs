//! Statistics collection and reporting
//!
//! This module provides:
//! - Shared hash counters updated by every worker
//! - An optional background thread logging hashrate and hardware usage
//! - The final [`SolutionReport`] printed at the end of a run

/// Live counters and the periodic reporter
///
/// The reporter handles:
/// - Atomic collection of throughput counters
/// - Hardware monitoring
/// - Periodic logging until its handle is dropped
pub mod reporter;

/// End-of-run report
pub mod summary;

// Re-export main components
pub use reporter::{HardwareStats, HashCounters, MiningStats, ReportingHandle, StatsReporter};
pub use summary::SolutionReport;
