//! Cluster resolution: partitions rows into groups connected by shared
//! synonyms.
//!
//! Each synonym's row list is a group. Groups are processed in index order
//! and unioned in a [`DisjointSet`]. The representative of the resulting
//! cluster is decided group by group:
//!
//! 1. the first row of the group that is deferred (clustered, but not its
//!    cluster's representative) names the parent: its representative keeps
//!    the merged cluster, and every other row of the group (together with
//!    any cluster it already belongs to) is folded into it;
//! 2. with no deferred row, the first row that is itself a representative
//!    keeps its cluster;
//! 3. otherwise the group's first row becomes the representative of a new
//!    cluster.
//!
//! After the pass the forest is flattened into a [`ClusterMap`] where every
//! non-representative row points directly at its representative, so a
//! single lookup always reaches the root.

use std::collections::BTreeSet;

use ahash::AHashMap;
use log::debug;

use crate::linkage::index::SynonymIndex;
use crate::linkage::union_find::DisjointSet;
use crate::progress::ProgressReporter;
use crate::table::RowIndex;

/// The cluster role of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterEntry {
    /// The row is the cluster root; `members` includes the root itself.
    Root { members: BTreeSet<RowIndex> },
    /// The row belongs to the cluster rooted at `target`.
    Deferred { target: RowIndex },
}

/// Cluster membership of every row that shares a synonym with another row.
///
/// Rows absent from the map are singletons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterMap {
    entries: AHashMap<RowIndex, ClusterEntry>,
    roots: BTreeSet<RowIndex>,
}

impl ClusterMap {
    /// Cluster entry of a row.
    pub fn get(&self, row: RowIndex) -> Option<&ClusterEntry> {
        self.entries.get(&row)
    }

    /// Whether the row belongs to any multi-row cluster.
    pub fn contains(&self, row: RowIndex) -> bool {
        self.entries.contains_key(&row)
    }

    pub fn is_root(&self, row: RowIndex) -> bool {
        self.roots.contains(&row)
    }

    /// Root of the cluster containing `row`.
    pub fn root_of(&self, row: RowIndex) -> Option<RowIndex> {
        match self.entries.get(&row)? {
            ClusterEntry::Root { .. } => Some(row),
            ClusterEntry::Deferred { target } => Some(*target),
        }
    }

    /// Members of the cluster rooted at `root`.
    pub fn members(&self, root: RowIndex) -> Option<&BTreeSet<RowIndex>> {
        match self.entries.get(&root)? {
            ClusterEntry::Root { members } => Some(members),
            ClusterEntry::Deferred { .. } => None,
        }
    }

    /// Cluster roots in ascending order.
    pub fn roots(&self) -> impl Iterator<Item = RowIndex> + '_ {
        self.roots.iter().copied()
    }

    /// Number of clusters.
    pub fn cluster_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of rows belonging to some cluster.
    pub fn clustered_rows(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size of the largest cluster.
    pub fn largest_cluster(&self) -> usize {
        self.roots()
            .filter_map(|root| self.members(root).map(BTreeSet::len))
            .max()
            .unwrap_or(0)
    }

    /// Build a map from explicit `(root, members)` clusters.
    pub fn from_clusters<I>(clusters: I) -> Self
    where
        I: IntoIterator<Item = (RowIndex, BTreeSet<RowIndex>)>,
    {
        let mut map = ClusterMap::default();
        for (root, members) in clusters {
            map.insert_cluster(root, members);
        }
        map
    }

    fn insert_cluster(&mut self, root: RowIndex, mut members: BTreeSet<RowIndex>) {
        members.insert(root);
        for &member in &members {
            if member != root {
                self.entries
                    .insert(member, ClusterEntry::Deferred { target: root });
            }
        }
        self.roots.insert(root);
        self.entries.insert(root, ClusterEntry::Root { members });
    }
}

/// Resolves a [`SynonymIndex`] into a [`ClusterMap`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterResolver;

impl ClusterResolver {
    pub fn new() -> Self {
        ClusterResolver
    }

    /// Run one pass over the index's groups.
    pub fn resolve(&self, index: &SynonymIndex, progress: &mut dyn ProgressReporter) -> ClusterMap {
        let mut sets = DisjointSet::new();

        for (_, group) in index.iter() {
            if group.len() > 1 {
                let keep = parent_of(&mut sets, group);

                for &row in group {
                    sets.union_into(keep, row);
                }
            }
            progress.advance(1);
        }

        let clusters = ClusterMap::from_clusters(sets.groups());

        debug!(
            "Resolved {} clusters covering {} rows",
            clusters.cluster_count(),
            clusters.clustered_rows()
        );
        clusters
    }
}

/// Representative that keeps the cluster formed by `group`.
fn parent_of(sets: &mut DisjointSet, group: &[RowIndex]) -> RowIndex {
    for &row in group {
        if sets.contains(row) {
            let representative = sets.representative(row);
            if representative != row {
                return representative;
            }
        }
    }
    group
        .iter()
        .copied()
        .find(|&row| sets.contains(row))
        .unwrap_or(group[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkage::index::SynonymIndexBuilder;
    use crate::progress::NoProgress;
    use crate::table::Table;

    fn resolve(rows: Vec<Vec<&str>>) -> ClusterMap {
        let table = Table::from_strings(rows).unwrap();
        let index = SynonymIndexBuilder::new(1).build(&table, &mut NoProgress);
        ClusterResolver::new().resolve(&index, &mut NoProgress)
    }

    #[test]
    fn test_shared_synonym_forms_cluster() {
        let clusters = resolve(vec![vec!["A", "X"], vec!["X", "B"], vec!["C", "D"]]);

        assert_eq!(clusters.cluster_count(), 1);
        assert_eq!(clusters.members(0), Some(&BTreeSet::from([0, 1])));
        assert_eq!(clusters.get(1), Some(&ClusterEntry::Deferred { target: 0 }));
        assert!(!clusters.contains(2));
    }

    #[test]
    fn test_transitive_membership() {
        let clusters = resolve(vec![vec!["X", "A"], vec!["X", "B"], vec!["B", "C"]]);

        assert_eq!(clusters.cluster_count(), 1);
        assert_eq!(clusters.members(0), Some(&BTreeSet::from([0, 1, 2])));
        assert_eq!(clusters.root_of(2), Some(0));
    }

    #[test]
    fn test_group_through_existing_root() {
        // "X" roots {0,1}; "Y" then links row 2 through root 0 itself.
        let clusters = resolve(vec![vec!["X", "Y"], vec!["X", "P"], vec!["Y", "Q"]]);

        assert_eq!(clusters.cluster_count(), 1);
        assert_eq!(clusters.members(0), Some(&BTreeSet::from([0, 1, 2])));
    }

    #[test]
    fn test_group_reaches_root_through_deferred_row() {
        // Index order: N{0,1}, J{0,3}, a, b, c, M{2,3}, ...
        // "N" roots 0, "J" folds row 3 into it, and "M" reaches root 0
        // through row 3.
        let clusters = resolve(vec![
            vec!["N", "J", "a"],
            vec!["N", "b", "c"],
            vec!["M", "d", "e"],
            vec!["M", "J", "f"],
        ]);

        assert_eq!(clusters.cluster_count(), 1);
        assert!(clusters.is_root(0));
        assert_eq!(clusters.members(0), Some(&BTreeSet::from([0, 1, 2, 3])));
    }

    #[test]
    fn test_merging_two_existing_clusters() {
        // Index order: P{0,1}, a, b{1,4}, Q{2,3}, c, d{3,4}.
        // "P"/"b" build root 0 with {0,1,4}, "Q" builds root 2 with {2,3},
        // then "d" joins them; row 3 is the first deferred row of the group,
        // so its root 2 survives.
        let clusters = resolve(vec![
            vec!["P", "a"],
            vec!["P", "b"],
            vec!["Q", "c"],
            vec!["Q", "d"],
            vec!["b", "d"],
        ]);

        assert_eq!(clusters.cluster_count(), 1);
        assert!(clusters.is_root(2));
        assert_eq!(clusters.members(2), Some(&BTreeSet::from([0, 1, 2, 3, 4])));
        assert_eq!(clusters.get(0), Some(&ClusterEntry::Deferred { target: 2 }));
    }

    #[test]
    fn test_deferred_row_wins_over_earlier_root() {
        // Index order: A{0,3}, p, B{1,2}, C{1,3}, q.
        // In group C, row 1 is a root and row 3 is deferred to 0: root 0 keeps
        // the merged cluster.
        let clusters = resolve(vec![
            vec!["A", "p"],
            vec!["B", "C"],
            vec!["B", "q"],
            vec!["A", "C"],
        ]);

        assert_eq!(clusters.roots().collect::<Vec<_>>(), vec![0]);
        assert_eq!(clusters.members(0), Some(&BTreeSet::from([0, 1, 2, 3])));
        assert_eq!(clusters.root_of(1), Some(0));
        assert_eq!(clusters.root_of(3), Some(0));
    }

    #[test]
    fn test_separate_clusters_stay_apart() {
        let clusters = resolve(vec![
            vec!["P", "r"],
            vec!["P", "s"],
            vec!["Q", "t"],
            vec!["Q", "u"],
            vec!["w", "x"],
        ]);

        assert_eq!(clusters.cluster_count(), 2);
        assert_eq!(clusters.roots().collect::<Vec<_>>(), vec![0, 2]);
        assert!(!clusters.contains(4));
    }

    #[test]
    fn test_deferred_entries_point_at_roots() {
        let clusters = resolve(vec![
            vec!["A", "B"],
            vec!["B", "C"],
            vec!["C", "D"],
            vec!["D", "E"],
            vec!["E", "F"],
        ]);

        for row in 0..5 {
            let root = clusters.root_of(row).unwrap();
            assert!(clusters.is_root(root));
        }
        assert_eq!(clusters.largest_cluster(), 5);
    }

    #[test]
    fn test_no_shared_synonyms() {
        let clusters = resolve(vec![vec!["A", "B"], vec!["C", "D"]]);
        assert!(clusters.is_empty());
        assert_eq!(clusters.largest_cluster(), 0);
    }
}
