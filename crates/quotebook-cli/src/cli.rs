use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quotebook_core::QuoteId;

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Keep, filter, export and sync a small library of quotes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Remote collection endpoint used for sync
    #[arg(long, global = true, value_name = "URL")]
    pub remote_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text (read from stdin when omitted)
        text: Vec<String>,
        /// Category of the quote
        #[arg(short, long)]
        category: String,
        /// Only store locally, skip pushing to the remote
        #[arg(long)]
        no_push: bool,
    },
    /// List quotes, optionally filtered by category
    List {
        /// Category to show ("all" for everything); defaults to the last selection
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single quote by id
    Show {
        /// Quote id
        id: QuoteId,
    },
    /// Show one random quote
    Random {
        /// Category to draw from; defaults to the last selection
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export all quotes as JSON
    Export {
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON export
    Import {
        /// JSON file to import ("-" reads stdin)
        path: PathBuf,
    },
    /// Synchronize once with the remote collection
    Sync,
    /// Synchronize periodically until interrupted
    Watch {
        /// Seconds between runs (overrides configuration)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update the configuration file
    Init {
        /// Remote collection endpoint
        #[arg(long, value_name = "URL")]
        remote_url: Option<String>,
        /// Seconds between periodic sync runs
        #[arg(long, value_name = "SECS")]
        sync_interval: Option<u64>,
        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Database file location
        #[arg(long = "database", value_name = "PATH")]
        database: Option<PathBuf>,
    },
    /// Print the resolved configuration
    Show,
}
