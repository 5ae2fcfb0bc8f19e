//! Disjoint-set forest over row indices.
//!
//! Uses path compression and union by size. Independently of the internal
//! tree shape, every set carries a *representative* row chosen by the caller
//! through [`DisjointSet::union_into`]; this is the row later emitted as the
//! cluster root.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use crate::table::RowIndex;

/// Disjoint sets of row indices with caller-chosen representatives.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet {
    parent: AHashMap<RowIndex, RowIndex>,
    /// Set size, valid for tree roots only.
    size: AHashMap<RowIndex, usize>,
    /// Representative row, valid for tree roots only.
    representative: AHashMap<RowIndex, RowIndex>,
}

impl DisjointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `row` has been added.
    pub fn contains(&self, row: RowIndex) -> bool {
        self.parent.contains_key(&row)
    }

    /// Add `row` as a singleton set if it is not present yet.
    pub fn make_set(&mut self, row: RowIndex) {
        if !self.contains(row) {
            self.parent.insert(row, row);
            self.size.insert(row, 1);
            self.representative.insert(row, row);
        }
    }

    /// Tree root of `row`'s set, compressing the path on the way.
    ///
    /// `row` is added as a singleton if absent.
    fn find(&mut self, row: RowIndex) -> RowIndex {
        self.make_set(row);

        let mut root = row;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        let mut current = row;
        while current != root {
            let next = self.parent[&current];
            self.parent.insert(current, root);
            current = next;
        }

        root
    }

    /// Representative row of `row`'s set.
    pub fn representative(&mut self, row: RowIndex) -> RowIndex {
        let root = self.find(row);
        self.representative[&root]
    }

    /// Number of rows in `row`'s set.
    pub fn set_size(&mut self, row: RowIndex) -> usize {
        let root = self.find(row);
        self.size[&root]
    }

    /// Merge `other`'s set into `keep`'s set. The merged set keeps the
    /// representative of `keep`'s set.
    pub fn union_into(&mut self, keep: RowIndex, other: RowIndex) {
        let keep_root = self.find(keep);
        let other_root = self.find(other);
        if keep_root == other_root {
            return;
        }

        let representative = self.representative[&keep_root];
        let keep_size = self.size[&keep_root];
        let other_size = self.size[&other_root];

        let (big, small) = if keep_size >= other_size {
            (keep_root, other_root)
        } else {
            (other_root, keep_root)
        };

        self.parent.insert(small, big);
        self.size.insert(big, keep_size + other_size);
        self.size.remove(&small);
        self.representative.remove(&small);
        self.representative.insert(big, representative);
    }

    /// All sets keyed by representative.
    pub fn groups(&mut self) -> BTreeMap<RowIndex, BTreeSet<RowIndex>> {
        let rows: Vec<RowIndex> = self.parent.keys().copied().collect();
        let mut groups: BTreeMap<RowIndex, BTreeSet<RowIndex>> = BTreeMap::new();
        for row in rows {
            let representative = self.representative(row);
            groups.entry(representative).or_default().insert(row);
        }
        groups
    }

    /// Number of rows added.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
