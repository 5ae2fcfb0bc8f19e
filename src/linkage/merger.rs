//! Record merging: turns a table and its clusters into output records.
//!
//! Rows are visited in ascending order. A row outside every cluster is
//! passed through unchanged. A cluster root yields one merged record holding
//! the set of qualifying text values of all its members. Non-root members
//! yield nothing; their values are carried by the root's record.

use std::collections::BTreeSet;

use log::debug;

use crate::linkage::qualifies;
use crate::linkage::resolver::{ClusterEntry, ClusterMap};
use crate::progress::ProgressReporter;
use crate::table::loader::DEFAULT_MISSING_TOKENS;
use crate::table::{RowIndex, Table};

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRecord {
    /// A row with no merge partner, cells kept verbatim.
    Passthrough { row: RowIndex, cells: Vec<String> },
    /// The union of a cluster's qualifying values.
    Merged {
        root: RowIndex,
        members: Vec<RowIndex>,
        values: BTreeSet<String>,
    },
}

impl OutputRecord {
    /// Source rows this record was built from.
    pub fn provenance(&self) -> &[RowIndex] {
        match self {
            OutputRecord::Passthrough { row, .. } => std::slice::from_ref(row),
            OutputRecord::Merged { members, .. } => members,
        }
    }

    /// Serialize as one delimited line without the trailing newline.
    pub fn to_line(&self, delimiter: char) -> String {
        let separator = delimiter.to_string();
        match self {
            OutputRecord::Passthrough { cells, .. } => cells.join(&separator),
            OutputRecord::Merged { values, .. } => values
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(&separator),
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, OutputRecord::Merged { .. })
    }
}

/// Builds [`OutputRecord`]s from a table and its cluster map.
#[derive(Debug, Clone)]
pub struct RecordMerger {
    min_syn_length: usize,
    missing_tokens: Vec<String>,
}

impl RecordMerger {
    /// Create a merger dropping merged values shorter than `min_syn_length`.
    pub fn new(min_syn_length: usize) -> Self {
        RecordMerger {
            min_syn_length,
            missing_tokens: DEFAULT_MISSING_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Replace the placeholder tokens excluded from merged records.
    pub fn with_missing_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Output record for a single row, or `None` when the row contributes
    /// through its cluster root or its cluster has no qualifying value.
    pub fn record_for(
        &self,
        table: &Table,
        clusters: &ClusterMap,
        row: RowIndex,
    ) -> Option<OutputRecord> {
        match clusters.get(row) {
            None => table.row(row).map(|cells| OutputRecord::Passthrough {
                row,
                cells: cells.iter().map(|cell| cell.raw().to_string()).collect(),
            }),
            Some(ClusterEntry::Deferred { .. }) => None,
            Some(ClusterEntry::Root { members }) => {
                let values = self.merged_values(table, members);
                if values.is_empty() {
                    debug!("Cluster rooted at row {row} has no qualifying values");
                    return None;
                }
                Some(OutputRecord::Merged {
                    root: row,
                    members: members.iter().copied().collect(),
                    values,
                })
            }
        }
    }

    /// Union of the qualifying text values of the given rows.
    pub fn merged_values(&self, table: &Table, members: &BTreeSet<RowIndex>) -> BTreeSet<String> {
        members
            .iter()
            .filter_map(|&member| table.row(member))
            .flatten()
            .filter_map(|cell| cell.as_text())
            .filter(|value| qualifies(value, self.min_syn_length) && !self.is_placeholder(value))
            .map(str::to_string)
            .collect()
    }

    /// Collect all records, advancing `progress` once per row.
    pub fn merge(
        &self,
        table: &Table,
        clusters: &ClusterMap,
        progress: &mut dyn ProgressReporter,
    ) -> Vec<OutputRecord> {
        let mut records = Vec::new();
        for row in 0..table.len() {
            if let Some(record) = self.record_for(table, clusters, row) {
                records.push(record);
            }
            progress.advance(1);
        }
        records
    }

    fn is_placeholder(&self, value: &str) -> bool {
        self.missing_tokens.iter().any(|token| token == value)
    }
}
