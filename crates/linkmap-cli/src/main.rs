//! linkmap CLI
//!
//! Command-line interface for the linkmap store

use clap::{Parser, Subcommand};
use linkmap_core::logging_facility::{self, Profile};
use linkmap_store::JournalMode;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "linkmap")]
#[command(about = "linkmap - parent/entry/link persistence", long_about = None)]
struct Cli {
    /// Logging profile: dev (human-readable) or prod (JSON)
    #[arg(long, global = true, default_value = "dev")]
    log: Profile,

    /// SQLite journal mode for the database file: wal, delete or memory
    #[arg(long, global = true, default_value = "wal")]
    journal_mode: JournalMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate(commands::migrate::MigrateArgs),
    /// Save a parent read from a JSON file
    Save(commands::save::SaveArgs),
    /// Print a stored parent as JSON
    Show(commands::show::ShowArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log);

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args, cli.journal_mode),
        Commands::Save(args) => commands::save::execute(args, cli.journal_mode),
        Commands::Show(args) => commands::show::execute(args, cli.journal_mode),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
