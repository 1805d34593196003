// src/main.rs
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use inversion_miner_rs::miner::{Evaluator, algorithm};
use inversion_miner_rs::utils::init_bench_logging;
use inversion_miner_rs::*;

/// Main entry point
///
/// Exit codes:
/// - `0` a solution was found and printed
/// - `1` the nonce space ran out without a solution, or the run failed
/// - `2` usage error (reported by clap)
fn main() -> ExitCode {
    let cli = cli::Commands::parse();

    let result = match cli.action {
        Some(cli::Action::Benchmark(opts)) => run_benchmark(opts).map(|_| ExitCode::SUCCESS),
        Some(cli::Action::Config(opts)) => generate_config(opts).map(|_| ExitCode::SUCCESS),
        None => start_mining(cli.mine),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })
}

/// Runs one search with the given options
///
/// # Operations
/// 1. Validates positional arguments and builds the configuration
/// 2. Prints the banner
/// 3. Runs the scheduler until a winner is known or the nonces run out
/// 4. Prints the report
fn start_mining(opts: cli::MineOptions) -> Result<ExitCode, MinerError> {
    let (Some(threads), Some(leading_zeros), Some(block_data)) =
        (opts.threads, opts.leading_zeros, opts.block_data.clone())
    else {
        cli::Commands::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "expected <THREADS> <LEADING_ZERO_BITS> <BLOCK_DATA>",
            )
            .exit()
    };

    if threads == 0 {
        return Err(MinerError::InputError(
            "number of threads must be at least 1".into(),
        ));
    }
    let job = MiningJob::new(&block_data, leading_zeros)?;

    utils::init_logging(opts.verbose);

    let mut config = match &opts.config {
        Some(path) => config::load(path)?,
        None => Config::default(),
    };
    // Apply CLI overrides
    config.worker_threads = threads;
    if let Some(algo) = opts.algorithm {
        config.algorithm = algo;
    }
    if let Some(range_size) = opts.range_size {
        config.range_size = range_size;
    }
    if opts.max_nonce.is_some() {
        config.max_nonce = opts.max_nonce;
    }
    if let Some(interval) = opts.report_interval {
        config.report_interval_secs = interval;
    }

    let scheduler = Scheduler::new(&config)?;

    if !opts.json {
        println!("Number of threads: {}", scheduler.worker_threads());
        println!("  Difficulty Mask: {}", job.difficulty);
        println!("       Block data: [{}]", block_data);
        println!("\n----------- Starting up miner threads!  -----------\n");
    }

    let outcome = scheduler.run(&job)?;
    let report = SolutionReport::from(&outcome);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(if report.solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs digest benchmarks
///
/// # Operations
/// 1. Initializes benchmark-specific logging
/// 2. Spawns worker threads hashing consecutive nonces
/// 3. Collects and reports throughput
fn run_benchmark(opts: cli::BenchmarkOptions) -> Result<(), MinerError> {
    init_bench_logging();

    if opts.threads == 0 {
        return Err(MinerError::InputError(
            "number of threads must be at least 1".into(),
        ));
    }

    let digest_algo = algorithm::create(opts.algorithm);
    let difficulty = DifficultyMask::from_leading_zeros(32)?;
    let block: Arc<[u8]> = Arc::from(opts.block.as_bytes());
    let reporter = stats::StatsReporter::new(Duration::from_secs(1));
    let _reporting = reporter.start_reporting();

    log::info!(
        "Starting {} benchmark for {} seconds on {} threads",
        opts.algorithm,
        opts.duration,
        opts.threads
    );

    let deadline = Duration::from_secs(opts.duration);
    let start_time = Instant::now();
    let handles = (0..opts.threads)
        .map(|id| {
            let algo = digest_algo.clone();
            let block = block.clone();
            let counters = reporter.counters();
            std::thread::Builder::new()
                .name(format!("bench-{}", id))
                .spawn(move || {
                    let mut evaluator = Evaluator::new(&*algo, &block, difficulty);
                    let mut digest = DigestBytes::default();
                    let mut nonce = id as u64 * (1 << 40);

                    while start_time.elapsed() < deadline {
                        for _ in 0..1024 {
                            evaluator.evaluate(nonce, &mut digest);
                            nonce += 1;
                        }
                        counters.record_hashes(1024);
                    }
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Wait for all threads to complete
    for handle in handles {
        handle
            .join()
            .map_err(|_| MinerError::TaskError("benchmark thread panicked".into()))?;
    }

    let stats = reporter.get_stats();
    log::info!("Benchmark results:");
    log::info!("Total hashes: {}", stats.hashes_total);
    log::info!("Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    log::info!("Average hashrate: {:.2} H/s", stats.avg_hashrate);
    log::logger().flush();

    Ok(())
}

/// Generates configuration template file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    std::fs::write(&opts.output, config::generate_template())?;
    println!("Wrote {}", opts.output.display());
    Ok(())
}
