//! Map-backed quadratic store
//!
//! Linear biases double as the set of present labels. Couplings are keyed
//! by [`UnorderedPair`], and a neighbour index keeps label removal
//! proportional to the label's degree. Only non-zero couplings are stored:
//! a coupling that cancels to zero leaves both the pair map and the
//! neighbour index.

use bqm_core::{AffineMap, BqmError, Label, QuadraticStore, Result, UnorderedPair};
use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;

/// Sparse storage keyed directly by labels
#[derive(Debug, Clone)]
pub struct SparseStore<L: Label> {
    linear: IndexMap<L, f64>,
    quadratic: HashMap<UnorderedPair<L>, f64>,
    neighbors: HashMap<L, HashSet<L>>,
}

impl<L: Label> Default for SparseStore<L> {
    fn default() -> Self {
        Self {
            linear: IndexMap::new(),
            quadratic: HashMap::new(),
            neighbors: HashMap::new(),
        }
    }
}

impl<L: Label> SparseStore<L> {
    fn require(&self, label: &L) -> Result<()> {
        if self.linear.contains_key(label) {
            Ok(())
        } else {
            Err(BqmError::UnknownLabel)
        }
    }

    fn link(&mut self, u: &L, v: &L) {
        self.neighbors.entry(u.clone()).or_default().insert(v.clone());
        self.neighbors.entry(v.clone()).or_default().insert(u.clone());
    }

    fn unlink(&mut self, u: &L, v: &L) {
        if let Some(set) = self.neighbors.get_mut(u) {
            set.remove(v);
        }
        if let Some(set) = self.neighbors.get_mut(v) {
            set.remove(u);
        }
    }

    /// Write the coupling of `u != v`, registering both labels
    fn store_coupling(&mut self, u: L, v: L, value: f64) {
        self.linear.entry(u.clone()).or_insert(0.0);
        self.linear.entry(v.clone()).or_insert(0.0);
        if value == 0.0 {
            self.unlink(&u, &v);
            self.quadratic.remove(&UnorderedPair::new(u, v));
        } else {
            self.link(&u, &v);
            self.quadratic.insert(UnorderedPair::new(u, v), value);
        }
    }
}

impl<L: Label> QuadraticStore<L> for SparseStore<L> {
    fn num_variables(&self) -> usize {
        self.linear.len()
    }

    fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    fn contains(&self, label: &L) -> bool {
        self.linear.contains_key(label)
    }

    fn variables(&self) -> Vec<L> {
        self.linear.keys().cloned().collect()
    }

    fn insert_label(&mut self, label: L) -> bool {
        if self.linear.contains_key(&label) {
            return false;
        }
        self.linear.insert(label, 0.0);
        true
    }

    fn delete_label(&mut self, label: &L) -> Result<()> {
        self.linear.swap_remove(label).ok_or(BqmError::UnknownLabel)?;
        if let Some(adjacent) = self.neighbors.remove(label) {
            for other in adjacent {
                self.quadratic
                    .remove(&UnorderedPair::new(label.clone(), other.clone()));
                if let Some(set) = self.neighbors.get_mut(&other) {
                    set.remove(label);
                }
            }
        }
        Ok(())
    }

    fn linear(&self, label: &L) -> Result<f64> {
        self.linear.get(label).copied().ok_or(BqmError::UnknownLabel)
    }

    fn add_linear(&mut self, label: L, bias: f64) {
        *self.linear.entry(label).or_insert(0.0) += bias;
    }

    fn set_linear(&mut self, label: L, bias: f64) {
        self.linear.insert(label, bias);
    }

    fn quadratic(&self, u: &L, v: &L) -> Result<f64> {
        self.require(u)?;
        self.require(v)?;
        if u == v {
            return self.linear(u);
        }
        Ok(self
            .quadratic
            .get(&UnorderedPair::new(u.clone(), v.clone()))
            .copied()
            .unwrap_or(0.0))
    }

    fn add_quadratic(&mut self, u: L, v: L, bias: f64) {
        if u == v {
            return self.add_linear(u, bias);
        }
        let current = self
            .quadratic
            .get(&UnorderedPair::new(u.clone(), v.clone()))
            .copied()
            .unwrap_or(0.0);
        self.store_coupling(u, v, current + bias);
    }

    fn set_quadratic(&mut self, u: L, v: L, bias: f64) {
        if u == v {
            return self.set_linear(u, bias);
        }
        self.store_coupling(u, v, bias);
    }

    fn remove_quadratic(&mut self, u: &L, v: &L) -> Result<f64> {
        self.require(u)?;
        self.require(v)?;
        if u == v {
            return Ok(0.0);
        }
        let old = self
            .quadratic
            .remove(&UnorderedPair::new(u.clone(), v.clone()))
            .unwrap_or(0.0);
        self.unlink(u, v);
        Ok(old)
    }

    fn for_each_linear<F: FnMut(&L, f64)>(&self, mut f: F) {
        for (label, &bias) in &self.linear {
            f(label, bias);
        }
    }

    fn for_each_quadratic<F: FnMut(&L, &L, f64)>(&self, mut f: F) {
        for (pair, &value) in &self.quadratic {
            f(pair.low(), pair.high(), value);
        }
    }

    fn for_each_neighbor<F: FnMut(&L, f64)>(&self, label: &L, mut f: F) -> Result<()> {
        self.require(label)?;
        let Some(adjacent) = self.neighbors.get(label) else {
            return Ok(());
        };
        for other in adjacent {
            let pair = UnorderedPair::new(label.clone(), other.clone());
            if let Some(&value) = self.quadratic.get(&pair) {
                f(other, value);
            }
        }
        Ok(())
    }

    fn scale(&mut self, factor: f64) {
        self.linear.values_mut().for_each(|v| *v *= factor);
        self.quadratic.values_mut().for_each(|v| *v *= factor);
    }

    fn apply_affine(&mut self, map: &AffineMap) -> f64 {
        let linear_sum: f64 = self.linear.values().sum();
        let mut quadratic_sum = 0.0;
        let mut neighbor_sums: HashMap<L, f64> = HashMap::with_capacity(self.linear.len());
        for (pair, &value) in &self.quadratic {
            quadratic_sum += value;
            *neighbor_sums.entry(pair.low().clone()).or_insert(0.0) += value;
            *neighbor_sums.entry(pair.high().clone()).or_insert(0.0) += value;
        }

        for (label, bias) in self.linear.iter_mut() {
            let neighbor_sum = neighbor_sums.get(label).copied().unwrap_or(0.0);
            *bias = map.apply_linear(*bias, neighbor_sum);
        }
        for value in self.quadratic.values_mut() {
            *value = map.apply_quadratic(*value);
        }
        map.offset_delta(linear_sum, quadratic_sum)
    }

    fn min_linear(&self) -> Result<f64> {
        self.linear
            .values()
            .copied()
            .reduce(f64::min)
            .ok_or(BqmError::EmptyLinear)
    }

    fn max_linear(&self) -> Result<f64> {
        self.linear
            .values()
            .copied()
            .reduce(f64::max)
            .ok_or(BqmError::EmptyLinear)
    }

    fn min_quadratic(&self) -> Result<f64> {
        self.quadratic
            .values()
            .copied()
            .reduce(f64::min)
            .ok_or(BqmError::EmptyQuadratic)
    }

    fn max_quadratic(&self) -> Result<f64> {
        self.quadratic
            .values()
            .copied()
            .reduce(f64::max)
            .ok_or(BqmError::EmptyQuadratic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_order_accumulates() {
        let mut store = SparseStore::default();
        store.add_quadratic(1, 2, 1.0);
        store.add_quadratic(2, 1, 2.0);
        assert_eq!(store.quadratic(&1, &2), Ok(3.0));
        assert_eq!(store.num_interactions(), 1);
        assert_eq!(store.num_variables(), 2);
        assert_eq!(store.linear(&1), Ok(0.0));
    }

    #[test]
    fn test_delete_is_local() {
        let mut store = SparseStore::default();
        store.add_quadratic('a', 'b', 1.0);
        store.add_quadratic('a', 'c', 2.0);
        store.add_quadratic('b', 'c', 3.0);
        store.add_linear('d', 4.0);

        store.delete_label(&'a').unwrap();
        assert!(!store.contains(&'a'));
        assert_eq!(store.num_interactions(), 1);
        assert_eq!(store.quadratic(&'b', &'c'), Ok(3.0));
        assert_eq!(store.degree(&'b'), Ok(1));
        assert_eq!(store.linear(&'d'), Ok(4.0));
        assert_eq!(store.quadratic(&'a', &'b'), Err(BqmError::UnknownLabel));
    }

    #[test]
    fn test_isolated_labels_count_for_extrema() {
        let mut store = SparseStore::default();
        assert_eq!(store.max_linear(), Err(BqmError::EmptyLinear));
        assert!(store.insert_label(5));
        assert!(!store.insert_label(5));
        assert_eq!(store.max_linear(), Ok(0.0));
        assert_eq!(store.min_quadratic(), Err(BqmError::EmptyQuadratic));
    }

    #[test]
    fn test_remove_quadratic_unlinks() {
        let mut store = SparseStore::default();
        store.add_quadratic(0, 1, -1.5);
        assert_eq!(store.remove_quadratic(&1, &0), Ok(-1.5));
        assert_eq!(store.degree(&0), Ok(0));
        assert_eq!(store.num_interactions(), 0);
        assert!(store.contains(&0) && store.contains(&1));
    }

    #[test]
    fn test_cancelled_coupling_is_pruned() {
        let mut store = SparseStore::default();
        store.add_quadratic('a', 'b', 2.0);
        store.add_quadratic('b', 'a', -2.0);
        assert_eq!(store.num_interactions(), 0);
        assert!(store.quadratic.is_empty());
        assert!(store.neighbors.values().all(|set| set.is_empty()));
        assert_eq!(store.min_quadratic(), Err(BqmError::EmptyQuadratic));
        assert_eq!(store.degree(&'a'), Ok(0));
        assert!(store.contains(&'a') && store.contains(&'b'));

        store.add_quadratic('a', 'c', 1.0);
        store.set_quadratic('c', 'a', 0.0);
        assert!(store.quadratic.is_empty());
        assert_eq!(store.quadratic(&'a', &'c'), Ok(0.0));

        store.add_quadratic('a', 'b', 0.5);
        assert_eq!(store.min_quadratic(), Ok(0.5));
        assert_eq!(store.degree(&'b'), Ok(1));
    }

    #[test]
    fn test_apply_affine_spin_to_binary() {
        // J s0 s1 + h s0 with J = 1, h = 0.5
        let mut store = SparseStore::default();
        store.add_quadratic(0, 1, 1.0);
        store.add_linear(0, 0.5);
        let delta = store.apply_affine(&AffineMap::SPIN_TO_BINARY);
        assert_eq!(store.quadratic(&0, &1), Ok(4.0));
        assert_eq!(store.linear(&0), Ok(-1.0));
        assert_eq!(store.linear(&1), Ok(-2.0));
        assert_eq!(delta, 0.5);
    }
}
