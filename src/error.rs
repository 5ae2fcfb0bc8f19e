//! Error types for the synmerge library.
//!
//! All fallible operations return [`SynmergeError`] through the crate-wide
//! [`Result`] alias.
//!
//! # Examples
//!
//! ```
//! use synmerge::error::{Result, SynmergeError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SynmergeError::config("min_syn_length must be set"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for synmerge operations.
///
/// Configuration problems (bad options, unreadable or ragged input) are
/// reported before any output is produced. Output failures abort the run.
#[derive(Error, Debug)]
pub enum SynmergeError {
    /// Delimited-file parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON config file or summary serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A row whose field count differs from the first row
    #[error("Ragged row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Writing merged records failed
    #[error("Output error: {0}")]
    Output(String),
}

/// Result type alias for operations that may fail with SynmergeError.
pub type Result<T> = std::result::Result<T, SynmergeError>;

impl SynmergeError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SynmergeError::Config(msg.into())
    }

    /// Create a new output error.
    pub fn output<S: Into<String>>(msg: S) -> Self {
        SynmergeError::Output(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SynmergeError::Config(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error was raised before processing started.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SynmergeError::Config(_) | SynmergeError::RaggedRow { .. } | SynmergeError::Csv(_)
        )
    }
}
