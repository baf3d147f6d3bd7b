//! Bidirectional label <-> position mapping
//!
//! The dense store addresses its matrix by position; this index keeps the
//! positions a gap-free `0..len` range. Removal moves the last label into
//! the freed slot, mirroring the swap-and-shrink of the matrix.

use bqm_core::Label;
use indexmap::IndexSet;

/// Ordered set of labels with O(1) lookups in both directions
#[derive(Debug, Clone)]
pub struct LabelIndex<L: Label> {
    labels: IndexSet<L>,
}

impl<L: Label> Default for LabelIndex<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> LabelIndex<L> {
    pub fn new() -> Self {
        Self {
            labels: IndexSet::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: IndexSet::with_capacity(capacity),
        }
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &L) -> bool {
        self.labels.contains(label)
    }

    /// Position of `label`, if present
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    /// Label stored at `index`
    pub fn label_at(&self, index: usize) -> Option<&L> {
        self.labels.get_index(index)
    }

    /// Position of `label`, allocating the next free one if absent
    ///
    /// Returns `(index, inserted)`.
    pub fn insert(&mut self, label: L) -> (usize, bool) {
        self.labels.insert_full(label)
    }

    /// Remove `label`, filling its slot with the last label
    ///
    /// Returns the freed index and, when another label was moved into it,
    /// the index that label came from.
    pub fn swap_remove(&mut self, label: &L) -> Option<(usize, Option<usize>)> {
        let last = self.labels.len().checked_sub(1)?;
        let (index, _) = self.labels.swap_remove_full(label)?;
        let moved_from = (index != last).then_some(last);
        Some((index, moved_from))
    }

    /// Labels in position order
    pub fn iter(&self) -> indexmap::set::Iter<'_, L> {
        self.labels.iter()
    }

    /// Labels sorted by value
    pub fn sorted_labels(&self) -> Vec<L> {
        let mut labels: Vec<L> = self.labels.iter().cloned().collect();
        labels.sort();
        labels
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijection<L: Label>(index: &LabelIndex<L>) {
        for (pos, label) in index.iter().enumerate() {
            assert_eq!(index.index_of(label), Some(pos));
            assert_eq!(index.label_at(pos), Some(label));
        }
    }

    #[test]
    fn test_insert_assigns_next_index() {
        let mut index = LabelIndex::new();
        assert_eq!(index.insert("a"), (0, true));
        assert_eq!(index.insert("b"), (1, true));
        assert_eq!(index.insert("a"), (0, false));
        assert_eq!(index.len(), 2);
        assert_bijection(&index);
    }

    #[test]
    fn test_swap_remove_compacts() {
        let mut index = LabelIndex::new();
        for label in ["a", "b", "c", "d"] {
            index.insert(label);
        }
        assert_eq!(index.swap_remove(&"b"), Some((1, Some(3))));
        assert_eq!(index.index_of(&"d"), Some(1));
        assert!(!index.contains(&"b"));
        assert_bijection(&index);

        // removing the last label moves nothing
        assert_eq!(index.swap_remove(&"c"), Some((2, None)));
        assert_eq!(index.swap_remove(&"zz"), None);
        assert_eq!(index.len(), 2);
        assert_bijection(&index);
    }

    #[test]
    fn test_sorted_labels() {
        let mut index = LabelIndex::new();
        for label in [5, 1, 3] {
            index.insert(label);
        }
        assert_eq!(index.sorted_labels(), vec![1, 3, 5]);
        assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![5, 1, 3]);
    }
}
