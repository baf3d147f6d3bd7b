//! Canonical interaction keys
//!
//! Both key types store their labels in sorted order, so the derived
//! `Hash` and `Eq` implementations are order-independent: `(a, b)` and
//! `(b, a)` hash and compare equal, and so do any two permutations of the
//! same label subset.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "alloc")]
use crate::{BqmError, Result};

/// Unordered pair of labels
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnorderedPair<L> {
    low: L,
    high: L,
}

impl<L: Ord> UnorderedPair<L> {
    /// Create a pair; argument order does not matter
    pub fn new(a: L, b: L) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Smaller label
    pub fn low(&self) -> &L {
        &self.low
    }

    /// Larger label
    pub fn high(&self) -> &L {
        &self.high
    }

    /// Whether both ends are the same label
    pub fn is_loop(&self) -> bool {
        self.low == self.high
    }

    /// Whether `label` is one of the ends
    pub fn contains(&self, label: &L) -> bool {
        &self.low == label || &self.high == label
    }

    /// The end opposite to `label`
    pub fn other(&self, label: &L) -> Option<&L> {
        if &self.low == label {
            Some(&self.high)
        } else if &self.high == label {
            Some(&self.low)
        } else {
            None
        }
    }

    /// Consume into `(low, high)`
    pub fn into_tuple(self) -> (L, L) {
        (self.low, self.high)
    }
}

impl<L: Ord> From<(L, L)> for UnorderedPair<L> {
    fn from((a, b): (L, L)) -> Self {
        Self::new(a, b)
    }
}

/// Sorted, duplicate-free label subset keying a polynomial term
///
/// The empty key stands for the constant term, a singleton for a linear
/// term.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolyKey<L>(Vec<L>);

#[cfg(feature = "alloc")]
impl<L: Ord> PolyKey<L> {
    /// Canonicalize a label sequence
    ///
    /// Fails with [`BqmError::DuplicateLabel`] if a label repeats.
    pub fn new(mut labels: Vec<L>) -> Result<Self> {
        labels.sort();
        if labels.windows(2).any(|w| w[0] == w[1]) {
            return Err(BqmError::DuplicateLabel);
        }
        Ok(Self(labels))
    }

    /// Constant-term key
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[L] {
        &self.0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, L> {
        self.0.iter()
    }

    pub fn contains(&self, label: &L) -> bool {
        self.0.binary_search(label).is_ok()
    }

    /// Key without `label`, or `None` if `label` is absent
    pub fn without(&self, label: &L) -> Option<Self>
    where
        L: Clone,
    {
        let pos = self.0.binary_search(label).ok()?;
        let mut labels = self.0.clone();
        labels.remove(pos);
        Some(Self(labels))
    }

    /// Sub-key selected by the bits of `mask` (bit `i` keeps label `i`)
    ///
    /// A subset of a sorted duplicate-free sequence is again canonical.
    pub fn subset(&self, mask: u64) -> Self
    where
        L: Clone,
    {
        let labels = self
            .0
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < 64 && mask & (1u64 << i) != 0)
            .map(|(_, l)| l.clone())
            .collect();
        Self(labels)
    }

    pub fn into_vec(self) -> Vec<L> {
        self.0
    }
}

#[cfg(feature = "alloc")]
impl<L: Ord> TryFrom<Vec<L>> for PolyKey<L> {
    type Error = BqmError;

    fn try_from(labels: Vec<L>) -> Result<Self> {
        Self::new(labels)
    }
}

#[cfg(feature = "alloc")]
impl<L: Ord> From<UnorderedPair<L>> for PolyKey<L> {
    fn from(pair: UnorderedPair<L>) -> Self {
        let (low, high) = pair.into_tuple();
        if low == high {
            Self(alloc::vec![low])
        } else {
            Self(alloc::vec![low, high])
        }
    }
}

#[cfg(feature = "alloc")]
impl<'a, L> IntoIterator for &'a PolyKey<L> {
    type Item = &'a L;
    type IntoIter = core::slice::Iter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
