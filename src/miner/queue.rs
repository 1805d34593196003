// src/miner/queue.rs
//! Bounded task queue and shared result slot
//!
//! The producer pushes [`NonceRange`]s, workers pop them from the front. A
//! single mutex guards the ranges *and* the winning [`Solution`], so
//! publishing a winner and switching the queue into draining mode happen in
//! one critical section. Two condition variables keep producer wakeups
//! (`not_full`) separate from worker wakeups (`not_empty`).
//!
//! Every wait loop re-checks the draining condition, so a winner published
//! while a thread is parked is never missed.

use crate::miner::algorithm::DigestBytes;
use crate::utils::error::MinerError;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Contiguous span of nonces `[start, end)` handed to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceRange {
    /// First nonce in the range
    pub start: u64,
    /// One past the last nonce in the range
    pub end: u64,
}

impl NonceRange {
    /// Creates the range `[start, end)`
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "inverted range {}..{}", start, end);
        NonceRange { start, end }
    }

    /// Number of nonces in the range
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// True if the range covers no nonces
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A nonce that satisfied the difficulty mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    /// Winning nonce (never 0; the search starts at 1)
    pub nonce: u64,
    /// Digest of `block ‖ nonce`
    pub digest: DigestBytes,
    /// Worker that found it
    pub worker_id: usize,
}

/// Outcome of [`TaskQueue::enqueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueStatus {
    /// The range was queued
    Accepted,
    /// The queue is draining; the range was dropped and production should stop
    Draining,
}

struct QueueState {
    ranges: VecDeque<NonceRange>,
    capacity: usize,
    winner: Option<Solution>,
    /// Producer has issued its last range
    closed: bool,
    /// A worker died; stop everything
    aborted: bool,
}

impl QueueState {
    fn draining(&self) -> bool {
        self.winner.is_some() || self.aborted
    }

    fn is_full(&self) -> bool {
        self.ranges.len() >= self.capacity
    }
}

/// Fixed-capacity FIFO of nonce ranges shared by the producer and workers
pub struct TaskQueue {
    state: Mutex<QueueState>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl TaskQueue {
    /// Creates an empty queue holding at most `capacity` ranges
    ///
    /// # Errors
    /// * `MinerError::InputError` if `capacity` is zero
    /// * `MinerError::AllocationError` if the backing storage cannot be reserved
    pub fn new(capacity: usize) -> Result<Self, MinerError> {
        if capacity == 0 {
            return Err(MinerError::InputError(
                "task queue capacity must be at least 1".into(),
            ));
        }

        let mut ranges = VecDeque::new();
        ranges.try_reserve_exact(capacity)?;

        Ok(TaskQueue {
            state: Mutex::new(QueueState {
                ranges,
                capacity,
                winner: None,
                closed: false,
                aborted: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    /// Append `range`, blocking while the queue is full
    ///
    /// Returns [`EnqueueStatus::Draining`] without touching the queue once a
    /// winner has been declared.
    ///
    /// # Panics
    /// Panics if called after [`TaskQueue::close`].
    pub fn enqueue(&self, range: NonceRange) -> EnqueueStatus {
        let mut state = self.lock();
        while state.is_full() && !state.draining() {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.draining() {
            return EnqueueStatus::Draining;
        }
        assert!(!state.closed, "enqueue on a closed task queue");

        state.ranges.push_back(range);
        self.not_empty.notify_one();
        EnqueueStatus::Accepted
    }

    /// Remove the oldest range, blocking while the queue is empty
    ///
    /// Returns `None` ("no more work") once the queue is draining, even if
    /// ranges remain, or once it is closed and empty.
    pub fn dequeue(&self) -> Option<NonceRange> {
        let mut state = self.lock();
        while state.ranges.is_empty() && !state.draining() && !state.closed {
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.draining() {
            return None;
        }

        let range = state.ranges.pop_front();
        match range {
            Some(_) => self.not_full.notify_one(),
            None => assert!(state.closed, "dequeue woke on an empty open queue"),
        }
        range
    }

    /// Offer a candidate solution to the shared result slot
    ///
    /// The candidate wins if no winner exists yet or its nonce is strictly
    /// smaller than the current winner's. The first winner switches the queue
    /// into draining mode and wakes every waiting thread. Returns whether the
    /// candidate is now the winner.
    pub fn publish(&self, candidate: Solution) -> bool {
        let mut state = self.lock();
        let first = state.winner.is_none();
        let replace = match &state.winner {
            None => true,
            Some(current) => candidate.nonce < current.nonce,
        };

        if replace {
            state.winner = Some(candidate);
        }
        if first {
            self.not_full.notify_all();
            self.not_empty.notify_all();
        }
        replace
    }

    /// Mark the end of production
    ///
    /// Workers finish whatever is still queued and then receive "no more
    /// work".
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.not_empty.notify_all();
    }

    /// Switch into draining mode without a winner and wake everybody
    pub fn abort(&self) {
        let mut state = self.lock();
        state.aborted = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Broadcast to every parked producer and worker
    pub fn wake_all(&self) {
        let _state = self.lock();
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Current winner, if any
    pub fn winner(&self) -> Option<Solution> {
        self.lock().winner
    }

    /// True once a winner exists or the queue was aborted
    pub fn is_draining(&self) -> bool {
        self.lock().draining()
    }

    /// True if the queue was aborted
    pub fn is_aborted(&self) -> bool {
        self.lock().aborted
    }

    /// Number of queued ranges
    pub fn len(&self) -> usize {
        self.lock().ranges.len()
    }

    /// True if no ranges are queued
    pub fn is_empty(&self) -> bool {
        self.lock().ranges.is_empty()
    }

    /// Maximum number of queued ranges
    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }

    // A panic elsewhere never holds this lock across user code, so the state
    // behind a poisoned mutex is still consistent.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
