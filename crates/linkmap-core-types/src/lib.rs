//! Core types shared across linkmap facilities
//!
//! Holds the canonical schema constants used by both the error facility
//! and the logging facility so every crate emits the same field keys and
//! event names.

pub mod schema;
