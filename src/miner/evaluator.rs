// src/miner/evaluator.rs
//! Hash-inversion evaluator
//!
//! Hashes `block ‖ decimal(nonce)` and checks the leading 32 bits of the
//! digest against a [`DifficultyMask`]. This is where the miner spends
//! nearly all of its time, so [`Evaluator`] keeps one input buffer holding the
//! block and only rewrites the nonce suffix between calls.

use crate::miner::algorithm::{Algorithm, DigestBytes};
use crate::miner::difficulty::DifficultyMask;

/// Decimal digits in `u64::MAX`
const MAX_NONCE_DIGITS: usize = 20;

/// Reusable per-thread evaluator for one block and difficulty
pub struct Evaluator<'a> {
    algorithm: &'a dyn Algorithm,
    mask: DifficultyMask,
    buffer: Vec<u8>,
    block_len: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator for `block` under `mask`
    pub fn new(algorithm: &'a dyn Algorithm, block: &[u8], mask: DifficultyMask) -> Self {
        let mut buffer = Vec::with_capacity(block.len() + MAX_NONCE_DIGITS);
        buffer.extend_from_slice(block);
        Evaluator {
            algorithm,
            mask,
            buffer,
            block_len: block.len(),
        }
    }

    /// Hash `block ‖ nonce` into `out` and report whether it meets the mask
    #[inline]
    pub fn evaluate(&mut self, nonce: u64, out: &mut DigestBytes) -> bool {
        self.buffer.truncate(self.block_len);
        push_decimal(&mut self.buffer, nonce);
        self.algorithm.digest_into(&self.buffer, out);
        self.mask.accepts(out.leading_word())
    }

    /// Evaluate every nonce in `[start, end)` in ascending order
    ///
    /// Returns the first satisfying nonce; `out` then holds its digest.
    pub fn scan_range(&mut self, start: u64, end: u64, out: &mut DigestBytes) -> Option<u64> {
        (start..end).find(|&nonce| self.evaluate(nonce, out))
    }
}

/// One-shot evaluation of a single nonce
pub fn evaluate(
    algorithm: &dyn Algorithm,
    block: &[u8],
    mask: DifficultyMask,
    nonce: u64,
    out: &mut DigestBytes,
) -> bool {
    Evaluator::new(algorithm, block, mask).evaluate(nonce, out)
}

/// One-shot scan of `[start, end)`
pub fn scan_range(
    algorithm: &dyn Algorithm,
    block: &[u8],
    mask: DifficultyMask,
    start: u64,
    end: u64,
    out: &mut DigestBytes,
) -> Option<u64> {
    Evaluator::new(algorithm, block, mask).scan_range(start, end, out)
}

/// Append the decimal form of `n` without going through `fmt`
fn push_decimal(buf: &mut Vec<u8>, mut n: u64) {
    let mut digits = [0u8; MAX_NONCE_DIGITS];
    let mut pos = MAX_NONCE_DIGITS;
    loop {
        pos -= 1;
        digits[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    buf.extend_from_slice(&digits[pos..]);
}
