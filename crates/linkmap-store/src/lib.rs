//! linkmap Store - SQLite persistence engine for the linkmap row pipeline
//!
//! Provides:
//! - Connection setup driven by `StoreConfig`
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteRepo`, which generates and runs the SQL for parent/entry/link
//!   rows and invokes the `RowLifecycle` hooks at their documented points

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use config::{JournalMode, StoreConfig};
pub use errors::Result;
pub use repo::{ExecutedStatement, SqliteRepo};
