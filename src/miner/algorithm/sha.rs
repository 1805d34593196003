// src/miner/algorithm/sha.rs
//! SHA-1 and SHA-256 primitives
//!
//! Thin adapters from the RustCrypto `Digest` API onto [`Algorithm`].

use crate::miner::algorithm::{Algorithm, DigestBytes};
use crate::types::DigestType;
use sha2::Digest;

/// SHA-1, the primitive used by the reference miner
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Algo;

impl Algorithm for Sha1Algo {
    fn digest_into(&self, input: &[u8], out: &mut DigestBytes) {
        out.set(&sha1::Sha1::digest(input));
    }

    fn output_len(&self) -> usize {
        20
    }

    fn algorithm_type(&self) -> DigestType {
        DigestType::Sha1
    }
}

/// SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Algo;

impl Algorithm for Sha256Algo {
    fn digest_into(&self, input: &[u8], out: &mut DigestBytes) {
        out.set(&sha2::Sha256::digest(input));
    }

    fn output_len(&self) -> usize {
        32
    }

    fn algorithm_type(&self) -> DigestType {
        DigestType::Sha256
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha1_known_vector() {
        let d = Sha1Algo.digest(b"abc");
        assert_eq!(d.as_bytes(), hex!("a9993e364706816aba3e25717850c26c9cd0d89d"));
        assert_eq!(d.to_hex(), "A9993E364706816ABA3E25717850C26C9CD0D89D");
    }

    #[test]
    fn sha256_known_vector() {
        let d = Sha256Algo.digest(b"abc");
        assert_eq!(
            d.as_bytes(),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(d.leading_word(), 0xba78_16bf);
    }

    #[test]
    fn reused_buffer_is_overwritten() {
        let mut out = Sha256Algo.digest(b"abc");
        Sha1Algo.digest_into(b"abc", &mut out);
        assert_eq!(out.len(), 20);
        assert_eq!(out, Sha1Algo.digest(b"abc"));
    }
}
