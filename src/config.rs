//! Run configuration.
//!
//! [`MergeConfig`] holds every recognized option with its default. Values can
//! be loaded from a JSON file and then overridden field by field from the
//! command line.
//!
//! ```json
//! {
//!   "hmdb_file_path": "hmdb.csv",
//!   "output_dir": "out",
//!   "min_syn_length": 4
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynmergeError};
use crate::table::loader::DEFAULT_MISSING_TOKENS;

/// Default minimum synonym length.
pub const DEFAULT_MIN_SYN_LENGTH: usize = 3;

/// Default match threshold.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.1;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = '#';

/// Default output file name inside the output directory.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "merged_hmdb.csv";

/// Options for one merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Path to the delimited input file.
    pub hmdb_file_path: PathBuf,
    /// Directory receiving the output file.
    pub output_dir: PathBuf,
    /// Output file name inside `output_dir`.
    pub output_file_name: String,
    /// Minimum length of an indexable or emittable synonym.
    pub min_syn_length: usize,
    /// Percentage overlap below which weak matches would be excluded.
    /// Accepted and validated but not applied.
    pub match_threshold: f64,
    /// Field delimiter of both input and output.
    pub delimiter: char,
    /// Tokens that mark a missing value.
    pub missing_tokens: Vec<String>,
    /// Truncate an existing output file instead of appending to it.
    pub overwrite: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            hmdb_file_path: PathBuf::new(),
            output_dir: PathBuf::from("."),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
            min_syn_length: DEFAULT_MIN_SYN_LENGTH,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            delimiter: DEFAULT_DELIMITER,
            missing_tokens: DEFAULT_MISSING_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            overwrite: false,
        }
    }
}

impl MergeConfig {
    /// Create a config for an input file with all other options defaulted.
    pub fn new<P: Into<PathBuf>>(hmdb_file_path: P) -> Self {
        MergeConfig {
            hmdb_file_path: hmdb_file_path.into(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            SynmergeError::config(format!("Cannot read config {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Full path of the output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file_name)
    }

    /// Check option values before any processing begins.
    pub fn validate(&self) -> Result<()> {
        if self.hmdb_file_path.as_os_str().is_empty() {
            return Err(SynmergeError::config("hmdb_file_path is required"));
        }
        if !self.hmdb_file_path.is_file() {
            return Err(SynmergeError::config(format!(
                "Input file not found: {}",
                self.hmdb_file_path.display()
            )));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(SynmergeError::invalid_argument(format!(
                "unsupported delimiter {:?}",
                self.delimiter
            )));
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(SynmergeError::invalid_argument(format!(
                "match_threshold must be between 0 and 1, got {}",
                self.match_threshold
            )));
        }
        if self.output_file_name.is_empty() {
            return Err(SynmergeError::config("output_file_name must not be empty"));
        }
        Ok(())
    }
}
