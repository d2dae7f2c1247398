//! Command line argument parsing for the wolfsearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// WolfSearch - a small, privacy-oriented full-text search engine
#[derive(Parser, Debug, Clone)]
#[command(name = "wolfsearch")]
#[command(about = "A small, privacy-oriented full-text search engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct WolfArgs {
    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Index directory
    #[arg(long, env = "WOLF_INDEX_DIR", default_value = "indexdir", global = true)]
    pub index_dir: PathBuf,

    /// Configuration file (JSON)
    #[arg(long, env = "WOLF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl WolfArgs {
    /// Effective verbosity: 0 quiet, 1 normal, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n.saturating_add(1),
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build or update the index from a folder of documents
    Index(IndexArgs),

    /// Search the index
    Search(SearchArgs),

    /// Remove a document by its path
    Delete(DeleteArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Arguments for indexing
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Folder of documents to index
    #[arg(long, env = "WOLF_DOCS_DIR", default_value = "docs")]
    pub docs_dir: PathBuf,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query string
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Maximum number of results (capped by the configured maximum)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Center snippets on the first matching term
    #[arg(long)]
    pub centered: bool,
}

/// Arguments for deleting a document
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Unique path of the document
    #[arg(value_name = "PATH")]
    pub path: String,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Include per-field vocabulary sizes
    #[arg(short, long)]
    pub detailed: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
