// src/stats/summary.rs
//! Final run report
//!
//! Rendered either as the classic multi-line text block or, with `--json`,
//! as a single JSON object.

use crate::miner::MiningOutcome;
use serde::Serialize;
use std::fmt;

/// What a finished run found and how fast it went
#[derive(Debug, Clone, Serialize)]
pub struct SolutionReport {
    /// Whether a solution was found
    pub solved: bool,
    /// Worker that found the winning nonce
    pub worker_id: Option<usize>,
    /// Winning nonce
    pub nonce: Option<u64>,
    /// Uppercase hex digest of `block ‖ nonce`
    pub hash: Option<String>,
    /// Hashes computed across all workers
    pub hashes: u64,
    /// Wall-clock search time in seconds
    pub elapsed_secs: f64,
    /// Average throughput in hashes per second
    pub hashrate: f64,
}

impl From<&MiningOutcome> for SolutionReport {
    fn from(outcome: &MiningOutcome) -> Self {
        let solution = outcome.solution.as_ref();
        SolutionReport {
            solved: solution.is_some(),
            worker_id: solution.map(|s| s.worker_id),
            nonce: solution.map(|s| s.nonce),
            hash: solution.map(|s| s.digest.to_hex()),
            hashes: outcome.hashes,
            elapsed_secs: outcome.elapsed.as_secs_f64(),
            hashrate: outcome.hashrate(),
        }
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.worker_id, self.nonce, &self.hash) {
            (Some(worker_id), Some(nonce), Some(hash)) => {
                writeln!(f, "Solution found by thread {}:", worker_id)?;
                writeln!(f, "Nonce: {}", nonce)?;
                writeln!(f, " Hash: {}", hash)?;
            }
            _ => writeln!(f, "No solution found!")?,
        }
        write!(
            f,
            "{} hashes in {:.2}s ({:.2} hashes/sec)",
            self.hashes, self.elapsed_secs, self.hashrate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::algorithm::DigestBytes;
    use crate::miner::queue::Solution;
    use std::time::Duration;

    fn outcome(solution: Option<Solution>) -> MiningOutcome {
        MiningOutcome {
            solution,
            hashes: 1000,
            ranges_issued: 10,
            elapsed: Duration::from_millis(500),
            workers: Vec::new(),
        }
    }

    #[test]
    fn renders_solution_block() {
        let report = SolutionReport::from(&outcome(Some(Solution {
            nonce: 42,
            digest: DigestBytes::from_slice(&[0x00, 0x0A, 0xFF]),
            worker_id: 3,
        })));

        assert_eq!(
            report.to_string(),
            "Solution found by thread 3:\nNonce: 42\n Hash: 000AFF\n1000 hashes in 0.50s (2000.00 hashes/sec)"
        );
    }

    #[test]
    fn renders_no_solution() {
        let report = SolutionReport::from(&outcome(None));
        assert!(!report.solved);
        assert!(report.to_string().starts_with("No solution found!\n"));
    }

    #[test]
    fn serializes_to_json() {
        let report = SolutionReport::from(&outcome(None));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["solved"], false);
        assert_eq!(value["hashes"], 1000);
        assert!(value["nonce"].is_null());
    }
}
