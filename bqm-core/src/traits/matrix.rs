//! Read-only matrix access used by the bulk loaders
//!
//! Dense and coordinate (COO) inputs both implement [`MatrixView`], so a
//! model can be built from either without caring how the entries are laid
//! out.

use super::element::MatrixElement;

/// Format-agnostic access to a square interaction matrix
pub trait MatrixView {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get an element at the specified position
    ///
    /// Returns `None` if the element is zero (not stored) or if the
    /// position is out of bounds.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of non-zero elements stored
    fn nnz(&self) -> usize;

    /// Visit every stored non-zero entry once
    ///
    /// The default walks all positions; sparse formats override it to visit
    /// only what they store. Entries appearing several times (e.g. repeated
    /// COO triplets) are visited once per occurrence and must be summed by
    /// the caller.
    fn for_each_nonzero<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        let (rows, cols) = self.dimensions();
        for row in 0..rows {
            for col in 0..cols {
                if let Some(value) = self.get_element(row, col) {
                    if !value.is_zero() {
                        f(row, col, value.to_f64());
                    }
                }
            }
        }
    }
}

impl<M: MatrixView> MatrixView for &M {
    type Element = M::Element;

    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element> {
        (**self).get_element(row, col)
    }

    fn dimensions(&self) -> (usize, usize) {
        (**self).dimensions()
    }

    fn nnz(&self) -> usize {
        (**self).nnz()
    }

    fn for_each_nonzero<F: FnMut(usize, usize, f64)>(&self, f: F) {
        (**self).for_each_nonzero(f)
    }
}
