//! Persistence-facing row forms
//!
//! A row composes its aggregate (`ParentRow.parent`, `EntryRow.entry`) with
//! the columns and child collections only storage cares about. The child
//! collections (`entry_rows`, `link_rows`) are scratch space: filled by
//! `before_write` or by the engine on read, emptied again before the call
//! that filled them returns.

pub mod entry_row;
pub mod link_row;
pub mod parent_row;

pub use entry_row::EntryRow;
pub use link_row::LinkRow;
pub use parent_row::ParentRow;
