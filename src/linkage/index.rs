//! Synonym index: maps each qualifying text value to the rows containing it.
//!
//! The index is the record-linkage counterpart of an inverted index: the
//! synonym plays the role of the term and the row index the role of the
//! document id. Posting lists are kept in first-seen order without
//! duplicates, and synonyms are iterated in the order they were first seen.

use ahash::AHashMap;
use log::debug;

use crate::linkage::qualifies;
use crate::progress::ProgressReporter;
use crate::table::{RowIndex, Table};

/// Mapping from synonym to the ordered, duplicate-free rows containing it.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    /// Synonyms in first-seen order with their row lists.
    entries: Vec<(String, Vec<RowIndex>)>,
    /// Position of each synonym in `entries`.
    positions: AHashMap<String, usize>,
}

impl SynonymIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `row` contains `synonym`.
    fn insert(&mut self, synonym: &str, row: RowIndex) {
        match self.positions.get(synonym) {
            Some(&position) => {
                let rows = &mut self.entries[position].1;
                // Rows are visited in ascending order, so a repeat within the
                // same row can only be the most recent entry.
                if rows.last() != Some(&row) {
                    rows.push(row);
                }
            }
            None => {
                self.positions
                    .insert(synonym.to_string(), self.entries.len());
                self.entries.push((synonym.to_string(), vec![row]));
            }
        }
    }

    /// Rows containing a synonym.
    pub fn get(&self, synonym: &str) -> Option<&[RowIndex]> {
        self.positions
            .get(synonym)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Iterate `(synonym, rows)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RowIndex])> {
        self.entries
            .iter()
            .map(|(synonym, rows)| (synonym.as_str(), rows.as_slice()))
    }

    /// Number of distinct synonyms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of synonyms shared by more than one row.
    pub fn shared_count(&self) -> usize {
        self.entries.iter().filter(|(_, rows)| rows.len() > 1).count()
    }
}

/// Builds a [`SynonymIndex`] from a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct SynonymIndexBuilder {
    min_syn_length: usize,
}

impl SynonymIndexBuilder {
    /// Create a builder that ignores text values shorter than `min_syn_length`.
    pub fn new(min_syn_length: usize) -> Self {
        SynonymIndexBuilder { min_syn_length }
    }

    /// Scan every cell of the table once.
    pub fn build(&self, table: &Table, progress: &mut dyn ProgressReporter) -> SynonymIndex {
        let mut index = SynonymIndex::new();

        for (row_index, row) in table.iter() {
            for cell in row {
                if let Some(value) = cell.as_text()
                    && qualifies(value, self.min_syn_length)
                {
                    index.insert(value, row_index);
                }
            }
            progress.advance(1);
        }

        debug!(
            "Indexed {} synonyms ({} shared) over {} rows",
            index.len(),
            index.shared_count(),
            table.len()
        );
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    fn build(rows: Vec<Vec<&str>>, min_len: usize) -> SynonymIndex {
        let table = Table::from_strings(rows).unwrap();
        SynonymIndexBuilder::new(min_len).build(&table, &mut NoProgress)
    }

    #[test]
    fn test_rows_per_synonym() {
        let index = build(vec![vec!["A", "X"], vec!["X", "B"], vec!["C", ""]], 1);

        assert_eq!(index.get("X"), Some(&[0, 1][..]));
        assert_eq!(index.get("A"), Some(&[0][..]));
        assert_eq!(index.get("C"), Some(&[2][..]));
        assert_eq!(index.len(), 4);
        assert_eq!(index.shared_count(), 1);
    }

    #[test]
    fn test_repeat_within_row_inserted_once() {
        let index = build(vec![vec!["glucose", "glucose"], vec!["glucose", "dextrose"]], 3);
        assert_eq!(index.get("glucose"), Some(&[0, 1][..]));
    }

    #[test]
    fn test_short_values_not_indexed() {
        let index = build(vec![vec!["ab", "cd"], vec!["ab", "cde"]], 3);
        assert!(index.get("ab").is_none());
        assert_eq!(index.get("cde"), Some(&[1][..]));
    }

    #[test]
    fn test_first_seen_order() {
        let index = build(vec![vec!["beta", "alpha"], vec!["gamma", "alpha"]], 1);
        let synonyms: Vec<&str> = index.iter().map(|(s, _)| s).collect();
        assert_eq!(synonyms, vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn test_non_text_cells_ignored() {
        let table = Table::new(vec![
            vec![
                crate::table::Cell::Number("42".to_string()),
                crate::table::Cell::Missing("nan".to_string()),
            ],
            vec![
                crate::table::Cell::Number("42".to_string()),
                crate::table::Cell::Missing("nan".to_string()),
            ],
        ])
        .unwrap();
        let index = SynonymIndexBuilder::new(0).build(&table, &mut NoProgress);
        assert!(index.is_empty());
    }
}
