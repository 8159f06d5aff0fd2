//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::config::StoreConfig;
use crate::errors::{from_rusqlite, io_error, Result};
use linkmap_core::linkmap_core_types::schema::{FIELD_FOREIGN_KEYS, FIELD_JOURNAL_MODE};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path, creating parent directories
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_error("create_db_dir", e))?;
    }
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open and configure a connection as described by `config`
pub fn open_with(config: &StoreConfig) -> Result<Connection> {
    let conn = match &config.path {
        Some(path) => open(path)?,
        None => open_in_memory()?,
    };
    configure(&conn, config)?;
    Ok(conn)
}

/// Apply connection-level pragmas
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    let foreign_keys = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {}", foreign_keys))
        .map_err(from_rusqlite)?;

    // journal_mode answers with the mode actually in effect
    let mode: String = conn
        .query_row(
            &format!("PRAGMA journal_mode = {}", config.journal_mode.as_str()),
            [],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    tracing::debug!(
        { FIELD_JOURNAL_MODE } = %mode,
        { FIELD_FOREIGN_KEYS } = config.foreign_keys,
        "configured connection"
    );

    Ok(())
}

/// Journal mode currently in effect, as SQLite names it (`wal`, `delete`, ...)
pub fn journal_mode(conn: &Connection) -> Result<String> {
    conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .map_err(from_rusqlite)
}
