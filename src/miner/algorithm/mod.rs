// src/miner/algorithm/mod.rs
//! Digest primitives
//!
//! The miner never looks inside the hash function. Everything it needs is
//! captured by the [`Algorithm`] trait: hash a byte string into a
//! [`DigestBytes`] buffer owned by the caller, so the hot scanning loop never
//! allocates.

/// SHA family implementations backed by the RustCrypto crates
pub mod sha;

pub use self::sha::{Sha1Algo, Sha256Algo};

use crate::types::DigestType;
use std::fmt;
use std::sync::Arc;

/// Largest digest any supported primitive produces (SHA-256)
pub const MAX_DIGEST_LEN: usize = 32;

/// Common interface for all digest primitives
pub trait Algorithm: Send + Sync {
    /// Hash `input` into `out`, replacing its previous contents
    fn digest_into(&self, input: &[u8], out: &mut DigestBytes);

    /// Convenience wrapper around [`Algorithm::digest_into`]
    fn digest(&self, input: &[u8]) -> DigestBytes {
        let mut out = DigestBytes::default();
        self.digest_into(input, &mut out);
        out
    }

    /// Size of the produced digest in bytes
    fn output_len(&self) -> usize;

    /// Get the algorithm type
    fn algorithm_type(&self) -> DigestType;
}

/// Build the primitive selected by `ty`
pub fn create(ty: DigestType) -> Arc<dyn Algorithm> {
    match ty {
        DigestType::Sha1 => Arc::new(Sha1Algo),
        DigestType::Sha256 => Arc::new(Sha256Algo),
    }
}

/// Fixed-capacity digest snapshot
///
/// Stored inline so a worker can keep the digest of a winning nonce and hand
/// it to the result slot by copy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DigestBytes {
    bytes: [u8; MAX_DIGEST_LEN],
    len: usize,
}

impl DigestBytes {
    /// Copy `bytes` into a new snapshot
    ///
    /// # Panics
    /// Panics if `bytes` is longer than [`MAX_DIGEST_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut out = Self::default();
        out.set(bytes);
        out
    }

    /// Overwrite the snapshot with `bytes`
    ///
    /// # Panics
    /// Panics if `bytes` is longer than [`MAX_DIGEST_LEN`].
    pub fn set(&mut self, bytes: &[u8]) {
        assert!(
            bytes.len() <= MAX_DIGEST_LEN,
            "digest of {} bytes exceeds {} byte buffer",
            bytes.len(),
            MAX_DIGEST_LEN
        );
        self.bytes[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
    }

    /// Digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// First 4 bytes read as a big-endian integer (zero-padded if shorter)
    pub fn leading_word(&self) -> u32 {
        let mut word = [0u8; 4];
        let n = self.len.min(4);
        word[..n].copy_from_slice(&self.bytes[..n]);
        u32::from_be_bytes(word)
    }

    /// Uppercase hex rendering used in reports
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.as_bytes())
    }

    /// Digest length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been hashed into this buffer yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for DigestBytes {
    fn default() -> Self {
        Self {
            bytes: [0u8; MAX_DIGEST_LEN],
            len: 0,
        }
    }
}

impl fmt::Debug for DigestBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestBytes({})", self.to_hex())
    }
}

impl fmt::Display for DigestBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_word_is_big_endian() {
        let d = DigestBytes::from_slice(&[0x00, 0x0A, 0xBC, 0xDE, 0xFF]);
        assert_eq!(d.leading_word(), 0x000A_BCDE);
    }

    #[test]
    fn leading_word_pads_short_digests() {
        let d = DigestBytes::from_slice(&[0x12, 0x34]);
        assert_eq!(d.leading_word(), 0x1234_0000);
        assert_eq!(DigestBytes::default().leading_word(), 0);
    }

    #[test]
    fn set_replaces_previous_contents() {
        let mut d = DigestBytes::from_slice(&[0xAA; 32]);
        d.set(&[0x01, 0x02]);
        assert_eq!(d.as_bytes(), &[0x01, 0x02]);
        assert_eq!(d.to_hex(), "0102");
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn oversized_digest_panics() {
        let _ = DigestBytes::from_slice(&[0u8; MAX_DIGEST_LEN + 1]);
    }

    #[test]
    fn factory_returns_requested_primitive() {
        assert_eq!(create(DigestType::Sha1).output_len(), 20);
        assert_eq!(create(DigestType::Sha256).output_len(), 32);
        assert_eq!(
            create(DigestType::Sha256).algorithm_type(),
            DigestType::Sha256
        );
    }
}
