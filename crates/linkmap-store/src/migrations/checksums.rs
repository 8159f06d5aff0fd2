//! Migration checksums
//!
//! A SHA-256 of each embedded migration is recorded when it is applied, so
//! later runs can tell whether the SQL shipped in the binary has drifted.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the migration SQL
pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}
