//! SHA-256 fingerprints of generated artifacts
//!
//! Generation is deterministic, so two exports of an unchanged project must
//! fingerprint identically. The CLI prints these so users can tell at a
//! glance whether a re-export changed anything.

use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 of an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines and CLI output
    pub fn short(&self) -> &str {
        &self.0[..12]
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        *self == Self::from_bytes(data)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
