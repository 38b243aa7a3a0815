//! Command-line interface definitions for dupsweep.
//!
//! Global options (verbosity, color, error format) apply to every
//! subcommand. `scan` only reports; `dedupe` reports and deletes.
//!
//! # Example
//!
//! ```bash
//! # List duplicate groups without touching anything
//! dupsweep scan ~/Downloads
//!
//! # Show what would be deleted, as JSON
//! dupsweep dedupe ~/Downloads --dry-run --output json
//!
//! # Delete duplicates, comparing bytes first and keeping the first path by name
//! dupsweep dedupe ~/Downloads --verify --keep lexicographic
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::SurvivorPolicy;

/// Find duplicate files by content and delete all but one copy.
///
/// Files are matched on size, MD5 and SHA-256 together. In every group of
/// identical files exactly one copy is kept.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as structured JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report duplicate groups without deleting anything
    Scan(ScanArgs),
    /// Delete every duplicate, keeping one copy per group
    Dedupe(DedupeArgs),
}

impl Commands {
    /// Options shared by every subcommand.
    #[must_use]
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Scan(args) => &args.common,
            Commands::Dedupe(args) => &args.common,
        }
    }
}

/// Walker and finder options shared by `scan` and `dedupe`.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Directory to search for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Gitignore-style patterns to skip (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links
    ///
    /// Off by default, so a link and its target are never treated as
    /// duplicates of each other.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Number of threads used to read and fingerprint files
    ///
    /// Lower values reduce disk thrashing on HDDs. 1 reads files one at a time.
    #[arg(
        long,
        value_name = "N",
        env = "DUPSWEEP_IO_THREADS",
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub io_threads: u16,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the dedupe subcommand.
#[derive(Debug, Args)]
pub struct DedupeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Compare each duplicate byte for byte with the kept copy before deleting it
    #[arg(long)]
    pub verify: bool,

    /// Which copy of each group to keep
    #[arg(
        long,
        value_enum,
        env = "DUPSWEEP_KEEP",
        default_value_t = SurvivorPolicy::FirstSeen
    )]
    pub keep: SurvivorPolicy,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
