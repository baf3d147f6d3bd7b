//! Owned input matrices for bulk model construction

use alloc::vec::Vec;

use crate::traits::{MatrixElement, MatrixView};
use crate::{BqmError, Result};

/// Row-major dense matrix
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T = f64> {
    nrows: usize,
    ncols: usize,
    data: Vec<T>,
}

impl<T: MatrixElement> DenseMatrix<T> {
    /// Wrap row-major `data` of shape `nrows x ncols`
    pub fn new(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self> {
        let expected = nrows
            .checked_mul(ncols)
            .ok_or(BqmError::DimensionMismatch)?;
        if data.len() != expected {
            return Err(BqmError::DimensionMismatch);
        }
        Ok(Self { nrows, ncols, data })
    }

    /// Square matrix of zeros
    pub fn zeros(n: usize) -> Self {
        Self {
            nrows: n,
            ncols: n,
            data: alloc::vec![T::ZERO; n * n],
        }
    }

    /// Build from a list of rows; all rows must have the same length
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(BqmError::DimensionMismatch);
            }
            data.extend(row);
        }
        Ok(Self { nrows, ncols, data })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Element at `(row, col)`, `None` out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.nrows && col < self.ncols {
            Some(self.data[row * self.ncols + col])
        } else {
            None
        }
    }

    /// Overwrite the element at `(row, col)`
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.nrows || col >= self.ncols {
            return Err(BqmError::DimensionMismatch);
        }
        self.data[row * self.ncols + col] = value;
        Ok(())
    }

    /// Row-major backing slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: MatrixElement> MatrixView for DenseMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        self.get(row, col).filter(|v| !v.is_zero())
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> usize {
        self.data.iter().filter(|v| !v.is_zero()).count()
    }

    fn for_each_nonzero<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        if self.ncols == 0 {
            return;
        }
        for (pos, value) in self.data.iter().enumerate() {
            if !value.is_zero() {
                f(pos / self.ncols, pos % self.ncols, value.to_f64());
            }
        }
    }
}

/// Coordinate-format sparse matrix
///
/// Repeated coordinates are allowed and add up.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<T = f64> {
    nrows: usize,
    ncols: usize,
    entries: Vec<(usize, usize, T)>,
}

impl<T: MatrixElement> CooMatrix<T> {
    /// Empty matrix of shape `nrows x ncols`
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            entries: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let mut matrix = Self::new(nrows, ncols);
        for (row, col, value) in triplets {
            matrix.push(row, col, value)?;
        }
        Ok(matrix)
    }

    /// Append one entry
    pub fn push(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.nrows || col >= self.ncols {
            return Err(BqmError::DimensionMismatch);
        }
        self.entries.push((row, col, value));
        Ok(())
    }

    /// Stored triplets in insertion order
    pub fn entries(&self) -> &[(usize, usize, T)] {
        &self.entries
    }
}

impl<T: MatrixElement> MatrixView for CooMatrix<T> {
    type Element = f64;

    fn get_element(&self, row: usize, col: usize) -> Option<f64> {
        let sum: f64 = self
            .entries
            .iter()
            .filter(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, v)| v.to_f64())
            .sum();
        if sum == 0.0 {
            None
        } else {
            Some(sum)
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    fn nnz(&self) -> usize {
        self.entries.iter().filter(|(_, _, v)| !v.is_zero()).count()
    }

    fn for_each_nonzero<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        for &(row, col, value) in &self.entries {
            if !value.is_zero() {
                f(row, col, value.to_f64());
            }
        }
    }
}
