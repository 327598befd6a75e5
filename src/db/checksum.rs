//! Checksum calculation for import deduplication.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of imported schedule content.
///
/// Computed over the raw upload so a re-import of the same file resolves
/// to the already stored schedule.
///
/// # Arguments
/// * `content` - Raw JSON content of the uploaded schedule
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}
