//! Security-hash essence: in-process SHA-256 digest.

use std::time::Instant;

use sha2::{Digest, Sha256};

use crate::essence::backend::{EssenceResult, SecurityBackend, Timing};
use crate::essence::types::SecurityResult;

/// Number of hex characters kept from the digest.
pub const HASH_PREFIX_LEN: usize = 16;

/// Baseline security backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digest;

impl Sha256Digest {
    /// Truncated lowercase hex digest of `data`.
    pub fn truncated_hex(data: &str) -> String {
        let digest = Sha256::digest(data.as_bytes());
        let mut hex = format!("{:x}", digest);
        hex.truncate(HASH_PREFIX_LEN);
        hex
    }
}

impl SecurityBackend for Sha256Digest {
    fn engine(&self) -> &'static str {
        "inprocess_fallback"
    }

    fn secure(&self, data: &str) -> EssenceResult<SecurityResult> {
        let start = Instant::now();
        let secure_hash = Self::truncated_hex(data);
        Ok(SecurityResult {
            secure_hash,
            length: data.chars().count(),
            engine: self.engine().to_string(),
            timing: Timing::since(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
        assert_eq!(Sha256Digest::truncated_hex("abc"), "ba7816bf8f01cfea");
        assert_eq!(Sha256Digest::truncated_hex(""), "e3b0c44298fc1c14");
    }

    #[test]
    fn test_deterministic() {
        let backend = Sha256Digest;
        let a = backend.secure("same input").unwrap();
        let b = backend.secure("same input").unwrap();
        assert_eq!(a.secure_hash, b.secure_hash);
        assert_eq!(a.secure_hash.len(), HASH_PREFIX_LEN);

        let c = backend.secure("other input").unwrap();
        assert_ne!(a.secure_hash, c.secure_hash);
    }

    #[test]
    fn test_length_counts_characters() {
        let result = Sha256Digest.secure("héllo").unwrap();
        assert_eq!(result.length, 5);
        assert_eq!(result.engine, "inprocess_fallback");
    }
}
