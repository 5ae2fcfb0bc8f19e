//! # synmerge
//!
//! Deduplicates a delimited chemical-database export by clustering rows that
//! share at least one textual synonym and writing one merged row per cluster.
//!
//! ## Features
//!
//! - Synonym index over every text cell of the table
//! - Transitive clustering of rows through shared synonyms
//! - Set-union merge of each cluster's values with length and placeholder
//!   filters
//! - Append-mode output in ascending row order

pub mod cli;
pub mod config;
pub mod error;
pub mod linkage;
pub mod pipeline;
pub mod progress;
pub mod table;

pub mod prelude {
    pub use crate::config::MergeConfig;
    pub use crate::error::{Result, SynmergeError};
    pub use crate::linkage::index::{SynonymIndex, SynonymIndexBuilder};
    pub use crate::linkage::merger::{OutputRecord, RecordMerger};
    pub use crate::linkage::resolver::{ClusterEntry, ClusterMap, ClusterResolver};
    pub use crate::pipeline::{MergeSummary, run_inspect, run_merge};
    pub use crate::progress::{LogProgress, NoProgress, ProgressReporter};
    pub use crate::table::{Cell, RowIndex, Table};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
