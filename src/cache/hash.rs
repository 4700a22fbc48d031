//! Content fingerprints for serialized filter parameters.

use sha2::{Digest, Sha256};

/// SHA256 of a serialized parameter as 64 lowercase hex characters.
///
/// Serialization is deterministic, so equal filter states always share a
/// fingerprint.
pub fn fingerprint(serialized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    format!("{:x}", hasher.finalize())
}
