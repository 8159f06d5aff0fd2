//! Save command: JSON file in, rows out

use clap::Args;
use linkmap_core::errors::LinkMapError;
use linkmap_core::{ExError, Parent, ParentRow};
use linkmap_store::errors::io_error;
use linkmap_store::JournalMode;

#[derive(Debug, Args)]
pub struct SaveArgs {
    #[arg(long, default_value = super::DEFAULT_DB)]
    pub db: String,

    /// JSON document holding one parent
    #[arg(long)]
    pub file: String,
}

pub fn execute(
    args: SaveArgs,
    journal_mode: JournalMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let json =
        std::fs::read_to_string(&args.file).map_err(|e| io_error("read_parent_file", e))?;
    let parent: Parent = serde_json::from_str(&json)
        .map_err(|e| ExError::from(LinkMapError::from(e)).with_entity_id(args.file.as_str()))?;

    let entries = parent.entries.len();
    let links = parent.link_count();
    let parent_pk = parent.parent_pk;

    let mut repo = super::open_repo(&args.db, journal_mode)?;
    repo.save_parent(&mut ParentRow::new(parent))?;

    println!(
        "saved parent {}: 1 parent, {} entries, {} links",
        parent_pk, entries, links
    );
    Ok(())
}
