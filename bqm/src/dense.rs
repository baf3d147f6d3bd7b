//! Matrix-backed quadratic store
//!
//! Biases live in one symmetric row-major matrix of side `n + 1`, where `n`
//! is the number of labels. Position `i < n` belongs to the label at index
//! `i` of the [`LabelIndex`]; the last row/column holds the linear biases
//! and its diagonal corner mirrors the model offset:
//!
//! ```text
//!        x0    x1    x2  | lin
//!   x0 [  0   J01   J02  | h0 ]
//!   x1 [ J01   0    J12  | h1 ]
//!   x2 [ J02  J12    0   | h2 ]
//!  lin [  h0   h1    h2  | c  ]
//! ```
//!
//! The corner is written only through [`QuadraticStore::sync_offset`].
//! Adding or removing a label rebuilds the matrix; removal moves the last
//! label into the freed position in the same step as the index update.

use bqm_core::constants::BQM_DENSE_SCHEMA_VERSION;
use bqm_core::{AffineMap, BqmError, DenseMatrix, Label, QuadraticStore, Result};

use crate::label_index::LabelIndex;

/// Dense symmetric storage addressed through a [`LabelIndex`]
#[derive(Debug, Clone)]
pub struct DenseStore<L: Label> {
    index: LabelIndex<L>,
    matrix: Vec<f64>,
}

impl<L: Label> Default for DenseStore<L> {
    fn default() -> Self {
        Self {
            index: LabelIndex::new(),
            matrix: vec![0.0],
        }
    }
}

impl<L: Label> DenseStore<L> {
    /// Side length of the backing matrix
    #[inline]
    fn side(&self) -> usize {
        self.index.len() + 1
    }

    /// Position of the linear row/column
    #[inline]
    fn border(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.matrix[row * self.side() + col]
    }

    #[inline]
    fn write_symmetric(&mut self, i: usize, j: usize, value: f64) {
        let side = self.side();
        self.matrix[i * side + j] = value;
        self.matrix[j * side + i] = value;
    }

    fn position(&self, label: &L) -> Result<usize> {
        self.index.index_of(label).ok_or(BqmError::UnknownLabel)
    }

    /// Position of `label`, growing the matrix if it is new
    fn ensure(&mut self, label: L) -> usize {
        let old_len = self.index.len();
        let (position, inserted) = self.index.insert(label);
        if inserted {
            self.grow(old_len);
        }
        position
    }

    /// Rebuild the matrix after the index grew from `old_len` labels
    ///
    /// New rows/columns start zeroed, the linear row/column moves last.
    fn grow(&mut self, old_len: usize) {
        let new_border = self.index.len();
        self.rebuild(old_len + 1, |pos| {
            if pos < old_len {
                Some(pos)
            } else if pos == new_border {
                Some(old_len)
            } else {
                None
            }
        });
    }

    /// Rebuild the matrix at the current side length
    ///
    /// `source(pos)` names the old position whose row/column lands at
    /// `pos`; `None` leaves it zeroed.
    fn rebuild<F: Fn(usize) -> Option<usize>>(&mut self, old_side: usize, source: F) {
        let side = self.side();
        let mut matrix = vec![0.0; side * side];
        for row in 0..side {
            let Some(old_row) = source(row) else { continue };
            for col in 0..side {
                if let Some(old_col) = source(col) {
                    matrix[row * side + col] = self.matrix[old_row * old_side + old_col];
                }
            }
        }
        self.matrix = matrix;
    }

    /// Label order of the rows of [`DenseStore::interaction_matrix`]
    pub fn labels(&self) -> &LabelIndex<L> {
        &self.index
    }

    /// Upper-triangular copy of the backing matrix
    ///
    /// Couplings sit above the diagonal, linear biases in the last column
    /// and the offset in the corner; everything below the diagonal is zero,
    /// so the result loads back through `from_matrix` unchanged.
    pub fn interaction_matrix(&self) -> Result<DenseMatrix> {
        let side = self.side();
        let mut upper = vec![0.0; side * side];
        for row in 0..side {
            for col in row..side {
                upper[row * side + col] = self.at(row, col);
            }
        }
        DenseMatrix::new(side, side, upper)
    }
}

impl<L: Label> QuadraticStore<L> for DenseStore<L> {
    const SCHEMA_VERSION: &'static str = BQM_DENSE_SCHEMA_VERSION;

    fn num_variables(&self) -> usize {
        self.index.len()
    }

    fn num_interactions(&self) -> usize {
        let n = self.index.len();
        (0..n)
            .map(|i| (i + 1..n).filter(|&j| self.at(i, j) != 0.0).count())
            .sum()
    }

    fn contains(&self, label: &L) -> bool {
        self.index.contains(label)
    }

    fn variables(&self) -> Vec<L> {
        self.index.iter().cloned().collect()
    }

    fn insert_label(&mut self, label: L) -> bool {
        let old_len = self.index.len();
        let (_, inserted) = self.index.insert(label);
        if inserted {
            self.grow(old_len);
        }
        inserted
    }

    fn extend_labels<I: IntoIterator<Item = L>>(&mut self, labels: I) -> usize {
        let old_len = self.index.len();
        for label in labels {
            self.index.insert(label);
        }
        let added = self.index.len() - old_len;
        if added > 0 {
            self.grow(old_len);
        }
        added
    }

    fn delete_label(&mut self, label: &L) -> Result<()> {
        let old_side = self.side();
        let (freed, moved_from) = self.index.swap_remove(label).ok_or(BqmError::UnknownLabel)?;
        let new_border = self.index.len();
        self.rebuild(old_side, |pos| {
            if pos == new_border {
                Some(old_side - 1)
            } else if pos == freed {
                moved_from
            } else {
                Some(pos)
            }
        });
        Ok(())
    }

    fn linear(&self, label: &L) -> Result<f64> {
        let i = self.position(label)?;
        Ok(self.at(i, self.border()))
    }

    fn add_linear(&mut self, label: L, bias: f64) {
        let i = self.ensure(label);
        let border = self.border();
        let value = self.at(i, border) + bias;
        self.write_symmetric(i, border, value);
    }

    fn set_linear(&mut self, label: L, bias: f64) {
        let i = self.ensure(label);
        let border = self.border();
        self.write_symmetric(i, border, bias);
    }

    fn quadratic(&self, u: &L, v: &L) -> Result<f64> {
        let i = self.position(u)?;
        let j = self.position(v)?;
        if i == j {
            return Ok(self.at(i, self.border()));
        }
        Ok(self.at(i, j))
    }

    fn add_quadratic(&mut self, u: L, v: L, bias: f64) {
        if u == v {
            return self.add_linear(u, bias);
        }
        let i = self.ensure(u);
        let j = self.ensure(v);
        let value = self.at(i, j) + bias;
        self.write_symmetric(i, j, value);
    }

    fn set_quadratic(&mut self, u: L, v: L, bias: f64) {
        if u == v {
            return self.set_linear(u, bias);
        }
        let i = self.ensure(u);
        let j = self.ensure(v);
        self.write_symmetric(i, j, bias);
    }

    fn remove_quadratic(&mut self, u: &L, v: &L) -> Result<f64> {
        let i = self.position(u)?;
        let j = self.position(v)?;
        if i == j {
            return Ok(0.0);
        }
        let old = self.at(i, j);
        self.write_symmetric(i, j, 0.0);
        Ok(old)
    }

    fn for_each_linear<F: FnMut(&L, f64)>(&self, mut f: F) {
        let border = self.border();
        for (i, label) in self.index.iter().enumerate() {
            f(label, self.at(i, border));
        }
    }

    fn for_each_quadratic<F: FnMut(&L, &L, f64)>(&self, mut f: F) {
        let labels: Vec<&L> = self.index.iter().collect();
        for (i, u) in labels.iter().enumerate() {
            for (j, v) in labels.iter().enumerate().skip(i + 1) {
                let value = self.at(i, j);
                if value != 0.0 {
                    f(u, v, value);
                }
            }
        }
    }

    fn for_each_neighbor<F: FnMut(&L, f64)>(&self, label: &L, mut f: F) -> Result<()> {
        let i = self.position(label)?;
        for (j, other) in self.index.iter().enumerate() {
            let value = self.at(i, j);
            if j != i && value != 0.0 {
                f(other, value);
            }
        }
        Ok(())
    }

    fn scale(&mut self, factor: f64) {
        let corner = self.matrix.len() - 1;
        for (pos, value) in self.matrix.iter_mut().enumerate() {
            if pos != corner {
                *value *= factor;
            }
        }
    }

    fn apply_affine(&mut self, map: &AffineMap) -> f64 {
        let n = self.index.len();
        let border = self.border();
        let mut linear_sum = 0.0;
        let mut quadratic_sum = 0.0;
        let mut neighbor_sums = vec![0.0; n];
        for i in 0..n {
            linear_sum += self.at(i, border);
            for j in i + 1..n {
                let coupling = self.at(i, j);
                quadratic_sum += coupling;
                neighbor_sums[i] += coupling;
                neighbor_sums[j] += coupling;
            }
        }

        for i in 0..n {
            let bias = map.apply_linear(self.at(i, border), neighbor_sums[i]);
            self.write_symmetric(i, border, bias);
            for j in i + 1..n {
                let coupling = map.apply_quadratic(self.at(i, j));
                self.write_symmetric(i, j, coupling);
            }
        }
        map.offset_delta(linear_sum, quadratic_sum)
    }

    fn min_linear(&self) -> Result<f64> {
        let border = self.border();
        (0..border)
            .map(|i| self.at(i, border))
            .reduce(f64::min)
            .ok_or(BqmError::EmptyLinear)
    }

    fn max_linear(&self) -> Result<f64> {
        let border = self.border();
        (0..border)
            .map(|i| self.at(i, border))
            .reduce(f64::max)
            .ok_or(BqmError::EmptyLinear)
    }

    fn min_quadratic(&self) -> Result<f64> {
        self.upper_triangle()
            .reduce(f64::min)
            .ok_or(BqmError::EmptyQuadratic)
    }

    fn max_quadratic(&self) -> Result<f64> {
        self.upper_triangle()
            .reduce(f64::max)
            .ok_or(BqmError::EmptyQuadratic)
    }

    fn sync_offset(&mut self, offset: f64) {
        let corner = self.matrix.len() - 1;
        self.matrix[corner] = offset;
    }
}

impl<L: Label> DenseStore<L> {
    /// Every coupling slot of the strict upper triangle, zeros included
    fn upper_triangle(&self) -> impl Iterator<Item = f64> + '_ {
        let n = self.index.len();
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| self.at(i, j)))
    }
}
