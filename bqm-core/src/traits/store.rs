//! Storage backend interface for quadratic models
//!
//! A model holds exactly one store, picked through a type parameter. The
//! dense and sparse implementations live in the `bqm` crate; this module
//! only fixes the contract they share.

use alloc::vec::Vec;

use super::label::Label;
use crate::constants::BQM_SCHEMA_VERSION;
use crate::{AffineMap, Result};

/// Label-addressed storage for linear biases and pairwise couplings
///
/// Contract shared by every backend:
/// - Each present label has exactly one linear slot (possibly 0.0).
/// - Each unordered pair of distinct labels has at most one coupling.
/// - `add_*` accumulates, `set_*` overwrites.
/// - A pair `(u, u)` is the linear slot of `u`; it never reaches
///   quadratic storage.
/// - Labels are added implicitly by `add_*`/`set_*`, removed only by
///   [`QuadraticStore::delete_label`].
pub trait QuadraticStore<L: Label>: Clone + Default {
    /// Schema version recorded when a model over this store is serialized
    const SCHEMA_VERSION: &'static str = BQM_SCHEMA_VERSION;

    /// Number of present labels
    fn num_variables(&self) -> usize;

    /// Number of stored couplings
    fn num_interactions(&self) -> usize;

    /// Whether `label` is present
    fn contains(&self, label: &L) -> bool;

    /// Present labels in storage order
    fn variables(&self) -> Vec<L>;

    /// Register `label` with a zero bias; returns `false` if already present
    fn insert_label(&mut self, label: L) -> bool;

    /// Register several labels, returning how many were new
    ///
    /// Backends that resize on insertion override this to resize once.
    fn extend_labels<I: IntoIterator<Item = L>>(&mut self, labels: I) -> usize {
        let mut added = 0;
        for label in labels {
            if self.insert_label(label) {
                added += 1;
            }
        }
        added
    }

    /// Remove `label` together with every coupling touching it
    fn delete_label(&mut self, label: &L) -> Result<()>;

    /// Linear bias of `label`
    fn linear(&self, label: &L) -> Result<f64>;

    /// Accumulate onto the linear bias of `label`
    fn add_linear(&mut self, label: L, bias: f64);

    /// Overwrite the linear bias of `label`
    fn set_linear(&mut self, label: L, bias: f64);

    /// Coupling between `u` and `v` (0.0 when no coupling is stored)
    ///
    /// Both labels must be present. `u == v` reads the linear slot.
    fn quadratic(&self, u: &L, v: &L) -> Result<f64>;

    /// Accumulate onto the coupling between `u` and `v`
    fn add_quadratic(&mut self, u: L, v: L, bias: f64);

    /// Overwrite the coupling between `u` and `v`
    fn set_quadratic(&mut self, u: L, v: L, bias: f64);

    /// Drop the coupling between `u` and `v`, returning its old value
    ///
    /// Labels stay present. A pair `(u, u)` has no coupling and yields 0.0.
    fn remove_quadratic(&mut self, u: &L, v: &L) -> Result<f64>;

    /// Visit every present label with its bias, in storage order
    fn for_each_linear<F: FnMut(&L, f64)>(&self, f: F);

    /// Visit every stored coupling once
    fn for_each_quadratic<F: FnMut(&L, &L, f64)>(&self, f: F);

    /// Visit the neighbours of `label` with the coupling to each
    fn for_each_neighbor<F: FnMut(&L, f64)>(&self, label: &L, f: F) -> Result<()>;

    /// Multiply every bias and coupling by `factor`
    fn scale(&mut self, factor: f64);

    /// Rewrite all coefficients with `map`, returning the offset change
    fn apply_affine(&mut self, map: &AffineMap) -> f64;

    fn min_linear(&self) -> Result<f64>;
    fn max_linear(&self) -> Result<f64>;
    fn min_quadratic(&self) -> Result<f64>;
    fn max_quadratic(&self) -> Result<f64>;

    /// Mirror the model offset into the store, for backends that keep it
    fn sync_offset(&mut self, _offset: f64) {}

    /// Number of couplings touching `label`
    fn degree(&self, label: &L) -> Result<usize> {
        let mut degree = 0;
        self.for_each_neighbor(label, |_, _| degree += 1)?;
        Ok(degree)
    }
}
