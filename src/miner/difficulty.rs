// src/miner/difficulty.rs
//! Difficulty constraint
//!
//! A difficulty of `k` leading zero bits becomes the mask
//! `(1 << (32 - k)) - 1`. The leading 32 bits of a digest satisfy it iff
//! `word & mask == word`, i.e. the top `k` bits are clear.

use crate::utils::error::MinerError;
use std::fmt;

/// Largest supported number of leading zero bits
pub const MAX_LEADING_ZEROS: u32 = 32;

/// Mask over the leading 32 bits of a digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyMask {
    leading_zeros: u32,
    mask: u32,
}

impl DifficultyMask {
    /// Build the mask requiring `leading_zeros` zero bits
    ///
    /// # Errors
    /// Returns `MinerError::InputError` if `leading_zeros` exceeds 32.
    pub fn from_leading_zeros(leading_zeros: u32) -> Result<Self, MinerError> {
        if leading_zeros > MAX_LEADING_ZEROS {
            return Err(MinerError::InputError(format!(
                "difficulty must be between 0 and {} leading zero bits, got {}",
                MAX_LEADING_ZEROS, leading_zeros
            )));
        }

        // 64-bit shift: k = 0 would overflow a 32-bit one
        let mask = ((1u64 << (MAX_LEADING_ZEROS - leading_zeros)) - 1) as u32;
        Ok(Self {
            leading_zeros,
            mask,
        })
    }

    /// True if `word` has all of its top `leading_zeros` bits clear
    #[inline]
    pub fn accepts(&self, word: u32) -> bool {
        word & self.mask == word
    }

    /// Raw mask value
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Required number of leading zero bits
    pub fn leading_zeros(&self) -> u32 {
        self.leading_zeros
    }
}

/// Renders the mask as 32 binary digits
impl fmt::Display for DifficultyMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032b}", self.mask)
    }
}
