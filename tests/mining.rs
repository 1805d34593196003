//! End-to-end searches through the public API

use inversion_miner_rs::miner::{algorithm, evaluator, scheduler};
use inversion_miner_rs::{Config, DigestBytes, DigestType, MiningJob, Scheduler, SolutionReport};
use std::thread;
use std::time::Duration;

fn config(threads: usize) -> Config {
    Config {
        worker_threads: threads,
        ..Config::default()
    }
}

/// First satisfying nonce found by a plain sequential scan
fn sequential_first(job: &MiningJob, bound: u64) -> u64 {
    let algo = algorithm::create(DigestType::Sha1);
    let mut digest = DigestBytes::default();
    evaluator::scan_range(&*algo, &job.block, job.difficulty, 1, bound, &mut digest)
        .expect("solution below bound")
}

#[test]
fn test_block_at_eight_bits_is_reproducible() {
    let job = MiningJob::new("test", 8).unwrap();
    assert_eq!(job.difficulty.mask(), 0x00FF_FFFF);

    let expected = sequential_first(&job, 1_000_000);
    let scheduler = Scheduler::new(&config(1)).unwrap();
    for _ in 0..3 {
        let solution = scheduler.run(&job).unwrap().solution.unwrap();
        assert_eq!(solution.nonce, expected);
        assert_eq!(solution.digest.as_bytes()[0], 0x00);
    }
}

#[test]
fn one_and_many_threads_report_valid_solutions() {
    let job = MiningJob::new("Hello CS 521!!!", 14).unwrap();
    let bound = sequential_first(&job, u64::MAX);

    for threads in [1, 2, 8] {
        let scheduler = Scheduler::new(&config(threads)).unwrap();
        let outcome = scheduler.run(&job).unwrap();
        let solution = outcome.solution.expect("solution");

        assert_eq!(
            scheduler::verify(scheduler.algorithm(), &job, solution.nonce),
            Some(solution.digest),
            "{} threads",
            threads
        );
        if threads == 1 {
            assert_eq!(solution.nonce, bound);
        }
        // best effort: never below the true first solution
        assert!(solution.nonce >= bound);
        assert_eq!(outcome.workers.len(), threads);
    }
}

#[test]
fn pool_terminates_promptly_after_winner() {
    // many workers, trivially easy target: most workers are parked when the
    // winner is declared and must all be woken
    let job = MiningJob::new("wake", 1).unwrap();
    let (tx, rx) = crossbeam_channel::bounded(1);

    let runner = thread::spawn(move || {
        let scheduler = Scheduler::new(&config(16)).unwrap();
        for _ in 0..20 {
            scheduler.run(&job).unwrap();
        }
        tx.send(()).unwrap();
    });

    rx.recv_timeout(Duration::from_secs(60))
        .expect("scheduler deadlocked");
    runner.join().unwrap();
}

#[test]
fn exhausted_search_reports_no_solution() {
    let cfg = Config {
        worker_threads: 4,
        max_nonce: Some(2_000),
        ..Config::default()
    };
    let scheduler = Scheduler::new(&cfg).unwrap();
    let outcome = scheduler.run(&MiningJob::new("test", 32).unwrap()).unwrap();

    assert!(outcome.solution.is_none());
    assert_eq!(outcome.hashes, 2_000);

    let report = SolutionReport::from(&outcome);
    assert!(!report.solved);
    assert!(report.to_string().contains("No solution found!"));
}

#[test]
fn sha256_search_digest_matches_recomputation() {
    let cfg = Config {
        worker_threads: 3,
        algorithm: DigestType::Sha256,
        range_size: 50,
        ..Config::default()
    };
    let scheduler = Scheduler::new(&cfg).unwrap();
    let job = MiningJob::new("digest", 10).unwrap();
    let solution = scheduler.run(&job).unwrap().solution.unwrap();

    let input = format!("digest{}", solution.nonce);
    let recomputed = algorithm::create(DigestType::Sha256).digest(input.as_bytes());
    assert_eq!(recomputed, solution.digest);
    assert!(recomputed.leading_word() >> 22 == 0);
}
