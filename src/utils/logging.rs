// src/utils/logging.rs
//! Logging configuration
//!
//! Logs go to stderr so stdout only carries the solution report. Uses
//! `env_logger` with a compact custom format; `RUST_LOG` always wins over
//! the command-line verbosity.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;

/// Initializes logging for a mining run
///
/// `verbosity` counts `-v` flags: 0 = Info, 1 = Debug, 2+ = Trace.
pub fn init_logging(verbosity: u8) {
    init_with_default(verbosity_level(verbosity));
}

/// Configures benchmark logging (Debug unless `RUST_LOG` says otherwise)
pub fn init_bench_logging() {
    init_with_default(LevelFilter::Debug);
}

/// Map a `-v` count onto a level filter
pub fn verbosity_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_with_default(level: LevelFilter) {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(level);
    } else {
        builder.parse_env("RUST_LOG");
    }

    // a logger may already be installed (e.g. from tests)
    if let Err(e) = builder.try_init() {
        log::debug!("Keeping existing logger: {}", e);
    }
}

/// Base builder: `[ts level module:line] message` on stderr
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            use std::io::Write;
            let ts = buf.timestamp_millis();
            let level = record.level();
            let module = record.module_path().unwrap_or_default();
            let line = record.line().unwrap_or(0);

            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                ts,
                level,
                module,
                line,
                record.args()
            )
        })
        .target(Target::Stderr);

    builder
}
