// src/miner/mod.rs
//! Core mining functionality
//!
//! This module contains all components of the search:
//! - Digest primitives and the difficulty mask
//! - The per-nonce evaluator
//! - The bounded task queue holding the shared result slot
//! - Worker threads and the range producer

/// Digest primitive implementations
///
/// Contains the [`Algorithm`] trait and the SHA-1 / SHA-256 adapters.
pub mod algorithm;

/// Leading-zero difficulty mask
pub mod difficulty;

/// Per-nonce hashing and range scanning
pub mod evaluator;

/// Bounded producer/consumer queue and winner slot
pub mod queue;

/// Range producer and worker pool lifecycle
///
/// Splits the nonce space into ranges, feeds the queue, and joins the
/// workers once a winner is known.
pub mod scheduler;

/// Worker thread implementation
///
/// Workers take ranges from the queue, scan them and publish solutions.
pub mod worker;

// Re-export main components for cleaner imports
pub use self::algorithm::{Algorithm, DigestBytes};
pub use self::difficulty::DifficultyMask;
pub use self::evaluator::Evaluator;
pub use self::queue::{EnqueueStatus, NonceRange, Solution, TaskQueue};
pub use self::scheduler::{MiningJob, MiningOutcome, Scheduler};
pub use self::worker::{Worker, WorkerContext, WorkerReport};
