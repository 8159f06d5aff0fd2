//! linkmap Core - row/aggregate mapping pipeline
//!
//! This crate provides the in-memory side of the linkmap persistence layer:
//! - `Parent` and `Entry` aggregates as application code sees them
//! - `ParentRow`, `EntryRow` and `LinkRow` persistence forms composed around them
//! - The `RowLifecycle` extension points a persistence engine invokes around
//!   every read and write (load-transform, save-transform, cleanup)
//! - Static table/column declarations for the three backing tables
//! - The structured error facility and logging facility shared by all crates
//!
//! The core never talks to a database; see `linkmap-store` for the engine.

pub mod errors;
pub mod lifecycle;
pub mod logging_facility;
pub mod model;
pub mod rows;
pub mod schema;

// Re-exported so the logging macros resolve schema constants through `$crate`
pub use linkmap_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, LinkMapError, Result};
pub use lifecycle::{HookContext, RowLifecycle};
pub use model::{Entry, Parent};
pub use rows::{EntryRow, LinkRow, ParentRow};
pub use schema::{ColumnDef, FkAction, ForeignKeyDef, SqlType, Table, TableDef};
