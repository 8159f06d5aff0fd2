//! Domain aggregates as application code sees them
//!
//! Aggregates carry no persistence-only fields; see `crate::rows` for the
//! row forms the engine reads and writes.

pub mod entry;
pub mod parent;

pub use entry::Entry;
pub use parent::Parent;
