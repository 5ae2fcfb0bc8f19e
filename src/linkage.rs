//! Record linkage over synonym columns.
//!
//! The linkage runs in three strictly sequential stages:
//!
//! - [`index::SynonymIndexBuilder`] - maps each qualifying text value to the
//!   rows containing it
//! - [`resolver::ClusterResolver`] - partitions rows into clusters connected
//!   by shared synonyms
//! - [`merger::RecordMerger`] - emits one record per singleton row and one
//!   merged record per cluster
//!
//! # Examples
//!
//! ```
//! use synmerge::linkage::index::SynonymIndexBuilder;
//! use synmerge::linkage::merger::RecordMerger;
//! use synmerge::linkage::resolver::ClusterResolver;
//! use synmerge::progress::NoProgress;
//! use synmerge::table::Table;
//!
//! let table = Table::from_strings([vec!["A", "X"], vec!["X", "B"], vec!["C", "D"]]).unwrap();
//! let index = SynonymIndexBuilder::new(1).build(&table, &mut NoProgress);
//! let clusters = ClusterResolver::new().resolve(&index, &mut NoProgress);
//! let records = RecordMerger::new(1).merge(&table, &clusters, &mut NoProgress);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].to_line('#'), "A#B#X");
//! assert_eq!(records[1].to_line('#'), "C#D");
//! ```

pub mod index;
pub mod merger;
pub mod resolver;
pub mod union_find;

/// Whether a text value is long enough to act as a synonym.
///
/// Length is counted in Unicode scalar values.
pub fn qualifies(value: &str, min_syn_length: usize) -> bool {
    value.chars().count() >= min_syn_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifies() {
        assert!(qualifies("abc", 3));
        assert!(!qualifies("ab", 3));
        assert!(qualifies("", 0));
        // Three characters, six bytes.
        assert!(qualifies("αβγ", 3));
        assert!(!qualifies("αβ", 3));
    }
}
