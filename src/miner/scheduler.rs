// src/miner/scheduler.rs
//! Range producer and worker pool lifecycle
//!
//! The calling thread becomes the producer: it carves the nonce space into
//! fixed-size ranges starting at 1 and pushes them into the bounded
//! [`TaskQueue`], blocking whenever the queue is full. Production stops when
//! the queue starts draining (a winner exists) or the search bound is
//! reached; the producer then wakes every worker and joins the pool.

use crate::config::Config;
use crate::miner::algorithm::{self, Algorithm, DigestBytes};
use crate::miner::difficulty::DifficultyMask;
use crate::miner::evaluator;
use crate::miner::queue::{EnqueueStatus, NonceRange, Solution, TaskQueue};
use crate::miner::worker::{Worker, WorkerContext, WorkerReport};
use crate::stats::{HashCounters, StatsReporter};
use crate::utils::error::MinerError;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// First nonce issued; 0 is reserved for "no winner"
pub const FIRST_NONCE: u64 = 1;

/// A block to solve at a given difficulty
#[derive(Debug, Clone)]
pub struct MiningJob {
    /// Block data every nonce is appended to
    pub block: Arc<[u8]>,
    /// Difficulty the digest must satisfy
    pub difficulty: DifficultyMask,
}

impl MiningJob {
    /// Creates a job for `block` requiring `leading_zeros` zero bits
    ///
    /// # Errors
    /// Returns `MinerError::InputError` if `leading_zeros` exceeds 32.
    pub fn new(block: impl AsRef<[u8]>, leading_zeros: u32) -> Result<Self, MinerError> {
        Ok(MiningJob {
            block: Arc::from(block.as_ref()),
            difficulty: DifficultyMask::from_leading_zeros(leading_zeros)?,
        })
    }
}

/// Result of a completed search
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    /// Winning solution, or `None` if the search bound was reached first
    pub solution: Option<Solution>,
    /// Hashes computed across all workers
    pub hashes: u64,
    /// Ranges the producer put into the queue
    pub ranges_issued: u64,
    /// Time from pool start to the last join
    pub elapsed: Duration,
    /// Per-worker accounting
    pub workers: Vec<WorkerReport>,
}

impl MiningOutcome {
    /// Average hashes per second over the run
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.hashes as f64 / secs
        } else {
            0.0
        }
    }
}

/// Coordinates one search across a fixed pool of worker threads
pub struct Scheduler {
    algorithm: Arc<dyn Algorithm>,
    worker_threads: usize,
    range_size: u64,
    queue_capacity: usize,
    nonce_limit: Option<u64>,
    report_interval: Duration,
}

impl Scheduler {
    /// Builds a scheduler from a validated configuration
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` if the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self, MinerError> {
        Self::with_algorithm(config, algorithm::create(config.algorithm))
    }

    /// Builds a scheduler around an explicit digest primitive, ignoring
    /// `config.algorithm`
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` if the configuration is invalid.
    pub fn with_algorithm(
        config: &Config,
        algorithm: Arc<dyn Algorithm>,
    ) -> Result<Self, MinerError> {
        config.validate()?;
        Ok(Scheduler {
            algorithm,
            worker_threads: config.worker_threads,
            range_size: config.range_size,
            queue_capacity: config.queue_capacity(),
            nonce_limit: config.max_nonce,
            report_interval: Duration::from_secs(config.report_interval_secs),
        })
    }

    /// Digest primitive in use
    pub fn algorithm(&self) -> &dyn Algorithm {
        &*self.algorithm
    }

    /// Number of worker threads
    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Search `job` until a solution is found or the nonce space runs out
    ///
    /// # Errors
    /// * `MinerError::AllocationError` if the task queue cannot be allocated
    /// * `MinerError::IoError` if a worker thread cannot be spawned
    /// * `MinerError::TaskError` if a worker thread panicked
    pub fn run(&self, job: &MiningJob) -> Result<MiningOutcome, MinerError> {
        let queue = Arc::new(TaskQueue::new(self.queue_capacity)?);
        let reporter = StatsReporter::new(self.report_interval);

        log::info!(
            "Mining with {} workers, {} leading zero bits, {} nonces per range, queue capacity {}",
            self.worker_threads,
            job.difficulty.leading_zeros(),
            self.range_size,
            self.queue_capacity
        );

        let pool = WorkerPool::spawn(
            self.worker_threads,
            job,
            &self.algorithm,
            &queue,
            reporter.counters(),
        )?;
        let _reporting = reporter.start_reporting();
        let started = Instant::now();

        let ranges_issued = self.produce(&queue);
        queue.wake_all();

        let workers = pool.join()?;
        let elapsed = started.elapsed();

        let solution = queue.winner();
        match &solution {
            Some(s) => log::info!("Worker {} won with nonce {}", s.worker_id, s.nonce),
            None => log::info!("Nonce space exhausted after {} ranges", ranges_issued),
        }

        Ok(MiningOutcome {
            solution,
            hashes: workers.iter().map(|w| w.hashes).sum(),
            ranges_issued,
            elapsed,
            workers,
        })
    }

    /// Producer loop; returns the number of ranges issued
    fn produce(&self, queue: &TaskQueue) -> u64 {
        // exclusive end of the search space
        let limit = match self.nonce_limit {
            Some(max) => max.saturating_add(1),
            None => u64::MAX,
        };

        let mut next = FIRST_NONCE;
        let mut issued = 0u64;
        loop {
            if next >= limit {
                log::debug!("producer reached nonce bound {}", limit);
                queue.close();
                break;
            }

            let end = next.saturating_add(self.range_size).min(limit);
            match queue.enqueue(NonceRange::new(next, end)) {
                EnqueueStatus::Accepted => {
                    log::trace!("issued range {}..{}", next, end);
                    issued += 1;
                    next = end;
                }
                EnqueueStatus::Draining => {
                    log::debug!("producer stopping: queue draining");
                    break;
                }
            }
        }
        issued
    }
}

/// Re-hash `nonce` and confirm it satisfies `job`
///
/// Returns the recomputed digest when it does.
pub fn verify(algorithm: &dyn Algorithm, job: &MiningJob, nonce: u64) -> Option<DigestBytes> {
    let mut digest = DigestBytes::default();
    evaluator::evaluate(algorithm, &job.block, job.difficulty, nonce, &mut digest).then_some(digest)
}

/// Spawned workers; aborts the queue and joins everything if dropped unjoined
struct WorkerPool {
    queue: Arc<TaskQueue>,
    handles: Vec<JoinHandle<WorkerReport>>,
}

impl WorkerPool {
    fn spawn(
        threads: usize,
        job: &MiningJob,
        algorithm: &Arc<dyn Algorithm>,
        queue: &Arc<TaskQueue>,
        counters: Arc<HashCounters>,
    ) -> Result<Self, MinerError> {
        let mut pool = WorkerPool {
            queue: queue.clone(),
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let worker = Worker::new(
                WorkerContext {
                    id,
                    block: job.block.clone(),
                    difficulty: job.difficulty,
                    algorithm: algorithm.clone(),
                },
                queue.clone(),
                counters.clone(),
            );
            // on error `pool` drops here and tears down the workers already running
            let handle = std::thread::Builder::new()
                .name(format!("miner-{}", id))
                .spawn(move || worker.run())?;
            pool.handles.push(handle);
        }

        Ok(pool)
    }

    fn join(mut self) -> Result<Vec<WorkerReport>, MinerError> {
        let mut reports = Vec::with_capacity(self.handles.len());
        let mut panicked = 0usize;

        for handle in self.handles.drain(..) {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(_) => panicked += 1,
            }
        }

        if panicked > 0 {
            return Err(MinerError::TaskError(format!(
                "{} worker thread(s) panicked",
                panicked
            )));
        }
        Ok(reports)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.queue.abort();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::algorithm::Sha1Algo;
    use crate::types::DigestType;
    use crossbeam_channel::bounded;

    /// SHA-1 that panics when asked to hash a nonce ending in `300`
    struct PanickingAlgo;

    impl Algorithm for PanickingAlgo {
        fn digest_into(&self, input: &[u8], out: &mut DigestBytes) {
            if input.ends_with(b"300") {
                panic!("digest failure on {:?}", String::from_utf8_lossy(input));
            }
            Sha1Algo.digest_into(input, out);
        }

        fn output_len(&self) -> usize {
            Sha1Algo.output_len()
        }

        fn algorithm_type(&self) -> DigestType {
            DigestType::Sha1
        }
    }

    fn config(threads: usize) -> Config {
        Config {
            worker_threads: threads,
            ..Config::default()
        }
    }

    #[test]
    fn single_worker_finds_first_solution() {
        let scheduler = Scheduler::new(&config(1)).unwrap();
        let job = MiningJob::new("test", 8).unwrap();

        let outcome = scheduler.run(&job).unwrap();
        let solution = outcome.solution.expect("solution");

        let mut digest = DigestBytes::default();
        let expected = evaluator::scan_range(
            scheduler.algorithm(),
            &job.block,
            job.difficulty,
            FIRST_NONCE,
            1_000_000,
            &mut digest,
        );
        assert_eq!(Some(solution.nonce), expected);
        assert_eq!(solution.digest, digest);
        assert_eq!(solution.worker_id, 0);
        // one worker scans every nonce up to the winner exactly once
        assert_eq!(outcome.hashes, solution.nonce);
    }

    #[test]
    fn zero_difficulty_reports_nonce_one() {
        for threads in [1, 4] {
            let scheduler = Scheduler::new(&config(threads)).unwrap();
            let outcome = scheduler.run(&MiningJob::new("test", 0).unwrap()).unwrap();
            assert_eq!(outcome.solution.map(|s| s.nonce), Some(1), "{} threads", threads);
        }
    }

    #[test]
    fn bounded_search_without_solution() {
        let cfg = Config {
            worker_threads: 3,
            range_size: 7,
            max_nonce: Some(100),
            ..Config::default()
        };
        let scheduler = Scheduler::new(&cfg).unwrap();
        let outcome = scheduler.run(&MiningJob::new("test", 32).unwrap()).unwrap();

        assert!(outcome.solution.is_none());
        // 100 nonces in ranges of 7
        assert_eq!(outcome.ranges_issued, 15);
        assert_eq!(outcome.hashes, 100);
        let scanned: u64 = outcome.workers.iter().map(|w| w.ranges_scanned).sum();
        assert_eq!(scanned, 15);
    }

    #[test]
    fn multi_worker_solution_verifies() {
        let cfg = Config {
            worker_threads: 4,
            algorithm: DigestType::Sha256,
            ..Config::default()
        };
        let scheduler = Scheduler::new(&cfg).unwrap();
        let job = MiningJob::new("Hello CS 521!!!", 12).unwrap();

        let outcome = scheduler.run(&job).unwrap();
        let solution = outcome.solution.expect("solution");

        assert_eq!(verify(scheduler.algorithm(), &job, solution.nonce), Some(solution.digest));
        assert!(solution.worker_id < 4);
        assert_eq!(outcome.workers.len(), 4);
        assert!(outcome.hashes >= 1);
    }

    #[test]
    fn worker_panic_stops_run_with_task_error() {
        let cfg = Config {
            worker_threads: 4,
            range_size: 10,
            queue_depth: 1,
            ..Config::default()
        };
        let scheduler = Scheduler::with_algorithm(&cfg, Arc::new(PanickingAlgo)).unwrap();
        assert_eq!(scheduler.worker_threads(), 4);
        // 32 bits: practically unsolvable, so only the panic can end the run
        let job = MiningJob::new("test", 32).unwrap();

        let (tx, rx) = bounded(1);
        let runner = std::thread::spawn(move || tx.send(scheduler.run(&job)).unwrap());

        let result = rx
            .recv_timeout(Duration::from_secs(20))
            .expect("run deadlocked after a worker panic");
        assert!(
            matches!(result, Err(MinerError::TaskError(_))),
            "unexpected result {:?}",
            result.map(|o| o.solution)
        );
        runner.join().unwrap();
    }

    #[test]
    fn dropping_unjoined_pool_aborts_and_joins_workers() {
        let queue = Arc::new(TaskQueue::new(2).unwrap());
        let job = MiningJob::new("test", 32).unwrap();
        let algo: Arc<dyn Algorithm> = Arc::new(Sha1Algo);
        let counters = Arc::new(HashCounters::new());

        let pool = WorkerPool::spawn(3, &job, &algo, &queue, counters.clone()).unwrap();
        queue.enqueue(NonceRange::new(1, 50));

        let (tx, rx) = bounded(1);
        std::thread::spawn(move || {
            drop(pool);
            tx.send(()).unwrap();
        });

        rx.recv_timeout(Duration::from_secs(20))
            .expect("pool drop did not release parked workers");
        assert!(queue.is_aborted());
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(matches!(
            Scheduler::new(&config(0)),
            Err(MinerError::ConfigError(_))
        ));
    }
}
