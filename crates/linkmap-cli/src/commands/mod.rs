//! Subcommand implementations

pub mod migrate;
pub mod save;
pub mod show;

use linkmap_store::{JournalMode, SqliteRepo, StoreConfig};

/// Default database location, relative to the working directory
pub const DEFAULT_DB: &str = ".linkmap/store.db";

/// Open (and migrate) the store at `db`
pub fn open_repo(db: &str, journal_mode: JournalMode) -> linkmap_store::Result<SqliteRepo> {
    SqliteRepo::open(&StoreConfig::file(db).with_journal_mode(journal_mode))
}
