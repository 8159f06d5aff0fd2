//! Schema migration command

use clap::Args;
use linkmap_store::migrations::applied_migrations;
use linkmap_store::{db, JournalMode};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[arg(long, default_value = super::DEFAULT_DB)]
    pub db: String,
}

pub fn execute(
    args: MigrateArgs,
    journal_mode: JournalMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = super::open_repo(&args.db, journal_mode)?;
    let applied = applied_migrations(repo.connection())?;
    let mode = db::journal_mode(repo.connection())?;

    println!(
        "{}: {} migration(s) applied, journal mode {}",
        args.db,
        applied.len(),
        mode
    );
    for id in applied {
        println!("  {}", id);
    }
    Ok(())
}
