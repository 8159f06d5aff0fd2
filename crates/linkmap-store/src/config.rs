//! Store configuration
//!
//! Everything the engine needs to open and prepare a connection. The CLI
//! builds one from its arguments; tests usually take `StoreConfig::in_memory()`.

use std::path::PathBuf;

/// SQLite journal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    Wal,
    Delete,
    Memory,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Delete => "DELETE",
            JournalMode::Memory => "MEMORY",
        }
    }
}

impl std::str::FromStr for JournalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wal" => Ok(JournalMode::Wal),
            "delete" => Ok(JournalMode::Delete),
            "memory" => Ok(JournalMode::Memory),
            other => Err(format!("unknown journal mode '{}'", other)),
        }
    }
}

/// Connection and engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file; `None` opens a private in-memory database
    pub path: Option<PathBuf>,
    /// Enforce foreign keys (needed for the ON DELETE SET NULL cascade)
    pub foreign_keys: bool,
    pub journal_mode: JournalMode,
    /// Keep a journal of executed write statements (see `SqliteRepo::statements`)
    pub record_statements: bool,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            foreign_keys: true,
            journal_mode: JournalMode::Memory,
            record_statements: false,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            foreign_keys: true,
            journal_mode: JournalMode::Wal,
            record_statements: false,
        }
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    pub fn with_record_statements(mut self, enabled: bool) -> Self {
        self.record_statements = enabled;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}
