// src/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Digest primitives the miner can invert
///
/// The primitive is treated as a black box: the miner only relies on it
/// being deterministic and producing at least 4 bytes of output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestType {
    /// SHA-1 (20-byte digest, 40 hex characters)
    #[default]
    #[value(name = "sha1")]
    Sha1,

    /// SHA-256 (32-byte digest, 64 hex characters)
    #[value(name = "sha256")]
    Sha256,
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestType::Sha1 => write!(f, "sha1"),
            DigestType::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for DigestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(DigestType::Sha1),
            "sha256" | "sha-256" => Ok(DigestType::Sha256),
            _ => Err(format!("Unknown digest: {}", s)),
        }
    }
}
