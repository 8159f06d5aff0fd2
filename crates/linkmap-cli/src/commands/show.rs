//! Show command

use clap::Args;
use linkmap_core::errors::LinkMapError;
use linkmap_core::ExError;
use linkmap_store::JournalMode;

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long, default_value = super::DEFAULT_DB)]
    pub db: String,

    #[arg(long)]
    pub parent: u64,
}

pub fn execute(
    args: ShowArgs,
    journal_mode: JournalMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = super::open_repo(&args.db, journal_mode)?;
    let parent = repo.find_parent(args.parent)?.into_parent();

    let rendered = serde_json::to_string_pretty(&parent)
        .map_err(|e| ExError::from(LinkMapError::from(e)))?;
    println!("{}", rendered);
    Ok(())
}
