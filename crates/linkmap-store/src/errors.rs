//! Error handling for linkmap-store
//!
//! Wraps linkmap-core ExError with store-specific helpers

use linkmap_core::errors::{ExError, ExErrorKind, LinkMapError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Wrap a failed read step so lifecycle hooks see it as upstream state
pub fn upstream_read(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Upstream)
        .with_op(op.to_string())
        .with_message("read failed before load-transform")
        .with_source(from_rusqlite(err))
}

/// Convert a u64 key into the signed INT8 column domain
pub fn key_to_sql(column: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        LinkMapError::KeyOutOfRange {
            column: column.to_string(),
            value,
        }
        .into()
    })
}

/// Convert a stored INT8 key back into a u64 key
pub fn key_from_sql(column: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        LinkMapError::NegativeStoredKey {
            column: column.to_string(),
            value,
        }
        .into()
    })
}
