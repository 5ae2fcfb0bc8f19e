//! Command line argument parsing for the synmerge CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// synmerge - merge delimited chemical records that share synonyms
#[derive(Parser, Debug, Clone)]
#[command(name = "synmerge")]
#[command(about = "Merge rows of a delimited chemical export that share a synonym")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SynmergeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SynmergeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Merge rows sharing a synonym and write the merged file
    Merge(MergeArgs),

    /// Report clusters without writing output
    Inspect(InspectArgs),
}

/// Options shared by every command that links rows.
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Minimum length of a value to count as a synonym
    #[arg(long, env = "SYNMERGE_MIN_SYN_LENGTH")]
    pub min_syn_length: Option<usize>,

    /// Overlap ratio for weak matches (accepted, not applied)
    #[arg(long, env = "SYNMERGE_MATCH_THRESHOLD")]
    pub match_threshold: Option<f64>,

    /// Field delimiter of input and output
    #[arg(short, long, env = "SYNMERGE_DELIMITER")]
    pub delimiter: Option<char>,

    /// Missing-value placeholder tokens (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub missing_tokens: Option<Vec<String>>,

    /// Log stage progress
    #[arg(long)]
    pub progress: bool,
}

/// Arguments for merging
#[derive(Parser, Debug, Clone)]
pub struct MergeArgs {
    /// Path to the input file ('#'-delimited, no header)
    #[arg(value_name = "HMDB_FILE_PATH", env = "SYNMERGE_HMDB_FILE_PATH")]
    pub hmdb_file_path: Option<PathBuf>,

    /// Directory receiving the merged file
    #[arg(value_name = "OUTPUT_DIR", env = "SYNMERGE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name of the merged file inside OUTPUT_DIR
    #[arg(long)]
    pub output_file_name: Option<String>,

    /// Truncate an existing output file instead of appending
    #[arg(long)]
    pub overwrite: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Arguments for cluster inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the input file ('#'-delimited, no header)
    #[arg(value_name = "HMDB_FILE_PATH", env = "SYNMERGE_HMDB_FILE_PATH")]
    pub hmdb_file_path: Option<PathBuf>,

    /// Number of clusters to list, largest first
    #[arg(long, default_value = "10")]
    pub show_clusters: usize,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
