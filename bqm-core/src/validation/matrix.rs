//! Validation and folding of input interaction matrices
//!
//! A matrix `M` over `n` labels describes the energy `x^T M x`. Folding
//! turns it into one coefficient per unordered pair: the coupling of
//! `(i, j)` is `M[i][j] + M[j][i]` and the linear bias of `i` is `M[i][i]`.
//! A bordered `(n + 1) x (n + 1)` matrix carries extra linear terms in its
//! last row and column; its corner is ignored (the offset is passed
//! separately).

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::traits::MatrixView;
use crate::{BqmError, Result};

/// How an input matrix lines up with the label vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixLayout {
    /// `n x n`, linear biases on the diagonal
    Plain,
    /// `(n + 1) x (n + 1)`, linear biases also in the last row/column
    Bordered,
}

/// Check squareness and match the dimension against `num_labels`
pub const fn matrix_layout(dimensions: (usize, usize), num_labels: usize) -> Result<MatrixLayout> {
    let (rows, cols) = dimensions;
    if rows != cols {
        return Err(BqmError::NonSquareMatrix);
    }
    if rows == num_labels {
        Ok(MatrixLayout::Plain)
    } else if rows == num_labels + 1 {
        Ok(MatrixLayout::Bordered)
    } else {
        Err(BqmError::DimensionMismatch)
    }
}

/// Sum repeated coordinates into one value per position
fn collect_entries<M: MatrixView>(matrix: &M) -> BTreeMap<(usize, usize), f64> {
    let mut entries = BTreeMap::new();
    matrix.for_each_nonzero(|row, col, value| {
        *entries.entry((row, col)).or_insert(0.0) += value;
    });
    entries
}

/// Require `|M[i][j] - M[j][i]| <= tolerance * max(1, |M[i][j]|, |M[j][i]|)`
pub fn validate_symmetric<M: MatrixView>(matrix: &M, tolerance: f64) -> Result<()> {
    let (rows, cols) = matrix.dimensions();
    if rows != cols {
        return Err(BqmError::NonSquareMatrix);
    }
    let entries = collect_entries(matrix);
    for (&(row, col), &value) in &entries {
        if row >= col {
            // each off-diagonal pair is checked once from its upper entry,
            // lower entries without an upper partner are caught below
            if row > col && !entries.contains_key(&(col, row)) && exceeds(value, 0.0, tolerance) {
                return Err(BqmError::AsymmetricMatrix);
            }
            continue;
        }
        let mirror = entries.get(&(col, row)).copied().unwrap_or(0.0);
        if exceeds(value, mirror, tolerance) {
            return Err(BqmError::AsymmetricMatrix);
        }
    }
    Ok(())
}

fn exceeds(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = 1.0f64.max(a.abs()).max(b.abs());
    (a - b).abs() > tolerance * scale
}

/// Index-addressed coefficients produced by [`fold_matrix`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FoldedMatrix {
    /// Linear bias per label position
    pub linear: Vec<f64>,
    /// `(i, j, coupling)` with `i < j`, sorted, zeros dropped
    pub couplings: Vec<(usize, usize, f64)>,
}

/// Fold a square matrix over `num_labels` labels into linear and pair terms
pub fn fold_matrix<M: MatrixView>(matrix: &M, num_labels: usize) -> Result<FoldedMatrix> {
    let layout = matrix_layout(matrix.dimensions(), num_labels)?;
    let border = num_labels;
    let mut linear = alloc::vec![0.0; num_labels];
    let mut couplings: BTreeMap<(usize, usize), f64> = BTreeMap::new();

    matrix.for_each_nonzero(|row, col, value| {
        if layout == MatrixLayout::Bordered && (row == border || col == border) {
            if row != col {
                linear[row.min(col)] += value;
            }
        } else if row == col {
            linear[row] += value;
        } else {
            *couplings.entry((row.min(col), row.max(col))).or_insert(0.0) += value;
        }
    });

    Ok(FoldedMatrix {
        linear,
        couplings: couplings
            .into_iter()
            .filter(|(_, v)| *v != 0.0)
            .map(|((i, j), v)| (i, j, v))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CooMatrix, DenseMatrix};
    use alloc::vec;

    #[test]
    fn test_matrix_layout() {
        assert_eq!(matrix_layout((3, 3), 3), Ok(MatrixLayout::Plain));
        assert_eq!(matrix_layout((4, 4), 3), Ok(MatrixLayout::Bordered));
        assert_eq!(matrix_layout((3, 4), 3), Err(BqmError::NonSquareMatrix));
        assert_eq!(matrix_layout((5, 5), 3), Err(BqmError::DimensionMismatch));
    }

    #[test]
    fn test_fold_symmetric_matrix() {
        let m = DenseMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.0],
            vec![0.5, -2.0, 1.5],
            vec![0.0, 1.5, 0.0],
        ])
        .unwrap();
        let folded = fold_matrix(&m, 3).unwrap();
        assert_eq!(folded.linear, vec![1.0, -2.0, 0.0]);
        assert_eq!(folded.couplings, vec![(0, 1, 1.0), (1, 2, 3.0)]);
    }

    #[test]
    fn test_fold_upper_triangular_matrix() {
        let m = DenseMatrix::from_rows(vec![vec![0.0, 4.0], vec![0.0, 1.0]]).unwrap();
        let folded = fold_matrix(&m, 2).unwrap();
        assert_eq!(folded.linear, vec![0.0, 1.0]);
        assert_eq!(folded.couplings, vec![(0, 1, 4.0)]);
    }

    #[test]
    fn test_fold_bordered_matrix() {
        // last column carries linear terms, corner ignored
        let m = DenseMatrix::from_rows(vec![
            vec![0.0, 2.0, 3.0],
            vec![0.0, 0.0, -1.0],
            vec![0.0, 0.0, 9.0],
        ])
        .unwrap();
        let folded = fold_matrix(&m, 2).unwrap();
        assert_eq!(folded.linear, vec![3.0, -1.0]);
        assert_eq!(folded.couplings, vec![(0, 1, 2.0)]);
    }

    #[test]
    fn test_fold_cancelling_entries() {
        let m = CooMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, -1.0)]).unwrap();
        let folded = fold_matrix(&m, 2).unwrap();
        assert!(folded.couplings.is_empty());
    }

    #[test]
    fn test_validate_symmetric() {
        let sym = DenseMatrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(validate_symmetric(&sym, 1e-10), Ok(()));

        let upper = DenseMatrix::from_rows(vec![vec![1.0, 2.0], vec![0.0, 0.0]]).unwrap();
        assert_eq!(
            validate_symmetric(&upper, 1e-10),
            Err(BqmError::AsymmetricMatrix)
        );

        let lower = CooMatrix::from_triplets(2, 2, vec![(1, 0, 2.0)]).unwrap();
        assert_eq!(
            validate_symmetric(&lower, 1e-10),
            Err(BqmError::AsymmetricMatrix)
        );

        let nearly = DenseMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0 + 1e-13, 0.0]]).unwrap();
        assert_eq!(validate_symmetric(&nearly, 1e-10), Ok(()));
    }
}
