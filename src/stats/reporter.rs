// src/stats/reporter.rs
use crossbeam_channel::{Sender, select};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use sysinfo::{Components, System};

/// Snapshot of search throughput
#[derive(Debug, Clone, Default)]
pub struct MiningStats {
    /// Total number of hashes computed
    pub hashes_total: u64,
    /// Number of nonce ranges fully or partially scanned
    pub ranges_scanned: u64,
    /// Time since the counters were created
    pub elapsed: Duration,
    /// Average hashrate since start (hashes per second)
    pub avg_hashrate: f64,
}

/// Statistics related to hardware performance
#[derive(Debug, Clone)]
pub struct HardwareStats {
    /// Current CPU usage percentage (0-100)
    pub cpu_usage: f32,
    /// Memory currently used by the system (in bytes)
    pub memory_used: u64,
    /// Current CPU temperature in Celsius (0 if unavailable)
    pub temperature: f32,
}

/// Throughput counters shared by every worker
///
/// Workers accumulate locally while scanning a range and add the total here
/// once per range, keeping contention off the hashing loop.
#[derive(Debug)]
pub struct HashCounters {
    hashes: AtomicU64,
    ranges: AtomicU64,
    start_time: Instant,
}

impl HashCounters {
    /// Creates zeroed counters starting the clock now
    pub fn new() -> Self {
        HashCounters {
            hashes: AtomicU64::new(0),
            ranges: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one scanned range that cost `hashes` digest computations
    pub fn record_range(&self, hashes: u64) {
        self.hashes.fetch_add(hashes, Ordering::Relaxed);
        self.ranges.fetch_add(1, Ordering::Relaxed);
    }

    /// Record hashes not tied to a range (benchmarks)
    pub fn record_hashes(&self, hashes: u64) {
        self.hashes.fetch_add(hashes, Ordering::Relaxed);
    }

    /// Current totals
    pub fn snapshot(&self) -> MiningStats {
        let elapsed = self.start_time.elapsed();
        let hashes = self.hashes.load(Ordering::Relaxed);
        let secs = elapsed.as_secs_f64();

        MiningStats {
            hashes_total: hashes,
            ranges_scanned: self.ranges.load(Ordering::Relaxed),
            elapsed,
            avg_hashrate: if secs > 0.0 { hashes as f64 / secs } else { 0.0 },
        }
    }
}

impl Default for HashCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects throughput counters and optionally logs them periodically
pub struct StatsReporter {
    counters: Arc<HashCounters>,
    report_interval: Duration,
}

impl StatsReporter {
    /// Creates a new StatsReporter with the specified reporting interval
    ///
    /// # Arguments
    /// * `report_interval` - How often to log statistics; zero disables it
    pub fn new(report_interval: Duration) -> Self {
        StatsReporter {
            counters: Arc::new(HashCounters::new()),
            report_interval,
        }
    }

    /// Shared handle to the counters for workers
    pub fn counters(&self) -> Arc<HashCounters> {
        self.counters.clone()
    }

    /// Gets the current mining statistics
    pub fn get_stats(&self) -> MiningStats {
        self.counters.snapshot()
    }

    /// Starts the periodic reporting of statistics
    ///
    /// Spawns a background thread that logs stats at the configured interval
    /// until the returned handle is dropped. Returns `None` when the interval
    /// is zero.
    pub fn start_reporting(&self) -> Option<ReportingHandle> {
        if self.report_interval.is_zero() {
            return None;
        }

        let counters = self.counters.clone();
        let ticker = crossbeam_channel::tick(self.report_interval);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);

        let thread = std::thread::Builder::new()
            .name("stats-reporter".into())
            .spawn(move || {
                let mut monitor = HardwareMonitor::new();
                loop {
                    let stop = select! {
                        recv(stop_rx) -> _ => true,
                        recv(ticker) -> _ => {
                            let mining = counters.snapshot();
                            let hw = monitor.sample();
                            log::info!(
                                "Hashrate: {:.2} H/s | Hashes: {} | Ranges: {} | CPU: {:.1}% | Mem: {} MiB | Temp: {:.1}°C",
                                mining.avg_hashrate,
                                mining.hashes_total,
                                mining.ranges_scanned,
                                hw.cpu_usage,
                                hw.memory_used / (1024 * 1024),
                                hw.temperature
                            );
                            false
                        }
                    };
                    if stop {
                        break;
                    }
                }
            });

        match thread {
            Ok(thread) => Some(ReportingHandle {
                stop: Some(stop_tx),
                thread: Some(thread),
            }),
            Err(e) => {
                log::warn!("Periodic stats disabled: {}", e);
                None
            }
        }
    }
}

/// Keeps the reporter thread alive; stops and joins it on drop
pub struct ReportingHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for ReportingHandle {
    fn drop(&mut self) {
        // disconnecting the channel wakes the select
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

struct HardwareMonitor {
    system: System,
    components: Components,
}

impl HardwareMonitor {
    fn new() -> Self {
        HardwareMonitor {
            system: System::new_all(),
            components: Components::new_with_refreshed_list(),
        }
    }

    fn sample(&mut self) -> HardwareStats {
        self.system.refresh_cpu_all();
        self.system.refresh_memory();
        self.components.refresh(true);

        let cpus = self.system.cpus();
        let cpu_usage = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
        };

        let temperature = self
            .components
            .iter()
            .find(|c| c.label().contains("CPU"))
            .and_then(|c| c.temperature())
            .unwrap_or(0.0);

        HardwareStats {
            cpu_usage,
            memory_used: self.system.used_memory(),
            temperature,
        }
    }
}
