//! Repository layer: the persistence engine behind the row pipeline
//!
//! `SqliteRepo` generates statements from the static table declarations,
//! runs them, and drives the `RowLifecycle` hooks around every call.

pub mod hydration;
pub mod journal;
pub mod sql;
pub mod sqlite_repo;

pub use journal::ExecutedStatement;
pub use sqlite_repo::SqliteRepo;

/// Operation names reported to hooks and logs
pub const OP_SAVE_PARENT: &str = "save_parent";
pub const OP_SAVE_ENTRY: &str = "save_entry";
pub const OP_FIND_PARENT: &str = "find_parent";
pub const OP_FIND_ENTRY: &str = "find_entry";
pub const OP_DELETE_PARENT: &str = "delete_parent";
pub const OP_DELETE_ENTRY: &str = "delete_entry";
