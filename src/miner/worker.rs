// src/miner/worker.rs
//! Worker thread implementation
//!
//! A worker loops over: wait for a range, scan it, and either publish a
//! solution (then exit) or go back for more work. It exits as soon as the
//! queue answers "no more work".

use crate::miner::algorithm::{Algorithm, DigestBytes};
use crate::miner::difficulty::DifficultyMask;
use crate::miner::evaluator::Evaluator;
use crate::miner::queue::{Solution, TaskQueue};
use crate::stats::HashCounters;
use std::sync::Arc;

/// Immutable per-worker configuration
#[derive(Clone)]
pub struct WorkerContext {
    /// Worker identifier reported with its solution
    pub id: usize,
    /// Block data every nonce is appended to
    pub block: Arc<[u8]>,
    /// Difficulty the digest must satisfy
    pub difficulty: DifficultyMask,
    /// Digest primitive
    pub algorithm: Arc<dyn Algorithm>,
}

/// What a worker did before exiting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker identifier
    pub worker_id: usize,
    /// Digests computed by this worker
    pub hashes: u64,
    /// Ranges taken from the queue
    pub ranges_scanned: u64,
    /// Nonce this worker found, whether or not it ended up winning
    pub found: Option<u64>,
}

/// Consumer side of the task queue
pub struct Worker {
    context: WorkerContext,
    queue: Arc<TaskQueue>,
    counters: Arc<HashCounters>,
}

impl Worker {
    /// Creates a new Worker instance
    ///
    /// # Arguments
    /// * `context` - Block, difficulty and identity of this worker
    /// * `queue` - Queue shared with the producer and other workers
    /// * `counters` - Live throughput counters
    pub fn new(context: WorkerContext, queue: Arc<TaskQueue>, counters: Arc<HashCounters>) -> Self {
        Worker {
            context,
            queue,
            counters,
        }
    }

    /// Runs until the queue signals "no more work" or a solution is found
    pub fn run(self) -> WorkerReport {
        let _abort = AbortOnPanic(&self.queue);
        let ctx = &self.context;
        let mut evaluator = Evaluator::new(&*ctx.algorithm, &ctx.block, ctx.difficulty);
        let mut digest = DigestBytes::default();
        let mut report = WorkerReport {
            worker_id: ctx.id,
            ..WorkerReport::default()
        };

        while let Some(range) = self.queue.dequeue() {
            log::trace!("worker {} scanning {}..{}", ctx.id, range.start, range.end);
            let found = evaluator.scan_range(range.start, range.end, &mut digest);

            let hashes = match found {
                Some(nonce) => nonce - range.start + 1,
                None => range.len(),
            };
            report.hashes += hashes;
            report.ranges_scanned += 1;
            self.counters.record_range(hashes);

            if let Some(nonce) = found {
                let accepted = self.queue.publish(Solution {
                    nonce,
                    digest,
                    worker_id: ctx.id,
                });
                log::debug!(
                    "worker {} found nonce {} ({})",
                    ctx.id,
                    nonce,
                    if accepted { "winner" } else { "superseded" }
                );
                report.found = Some(nonce);
                break;
            }
        }

        log::debug!(
            "worker {} exiting after {} ranges / {} hashes",
            ctx.id,
            report.ranges_scanned,
            report.hashes
        );
        report
    }
}

/// Aborts the queue if the owning worker unwinds, so nobody waits on it
struct AbortOnPanic<'a>(&'a TaskQueue);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::algorithm::Sha1Algo;
    use crate::miner::evaluator;
    use crate::miner::queue::NonceRange;

    fn context(k: u32) -> WorkerContext {
        WorkerContext {
            id: 7,
            block: Arc::from(&b"test"[..]),
            difficulty: DifficultyMask::from_leading_zeros(k).unwrap(),
            algorithm: Arc::new(Sha1Algo),
        }
    }

    #[test]
    fn drains_closed_queue_without_solution() {
        let queue = Arc::new(TaskQueue::new(4).unwrap());
        queue.enqueue(NonceRange::new(1, 11));
        queue.enqueue(NonceRange::new(11, 21));
        queue.close();
        let counters = Arc::new(HashCounters::new());

        let report = Worker::new(context(32), queue.clone(), counters.clone()).run();

        assert_eq!(report.ranges_scanned, 2);
        assert_eq!(report.hashes, 20);
        assert_eq!(report.found, None);
        assert_eq!(counters.snapshot().hashes_total, 20);
        assert!(queue.winner().is_none());
    }

    #[test]
    fn publishes_first_solution_and_stops() {
        let queue = Arc::new(TaskQueue::new(4).unwrap());
        queue.enqueue(NonceRange::new(1, 100_001));
        queue.enqueue(NonceRange::new(100_001, 100_002));
        queue.close();

        let report = Worker::new(context(8), queue.clone(), Arc::new(HashCounters::new())).run();

        let ctx = context(8);
        let mut expected_digest = DigestBytes::default();
        let expected = evaluator::scan_range(
            &Sha1Algo,
            &ctx.block,
            ctx.difficulty,
            1,
            100_001,
            &mut expected_digest,
        );

        let winner = queue.winner().expect("solution published");
        assert_eq!(Some(winner.nonce), expected);
        assert_eq!(winner.digest, expected_digest);
        assert_eq!(winner.worker_id, 7);
        assert_eq!(report.found, expected);
        assert_eq!(report.hashes, winner.nonce);
        assert_eq!(report.ranges_scanned, 1);
        // the second range is left behind in the drained queue
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn exits_immediately_when_already_draining() {
        let queue = Arc::new(TaskQueue::new(2).unwrap());
        queue.enqueue(NonceRange::new(1, 2));
        queue.abort();

        let report = Worker::new(context(0), queue, Arc::new(HashCounters::new())).run();
        assert_eq!(report.ranges_scanned, 0);
    }
}
