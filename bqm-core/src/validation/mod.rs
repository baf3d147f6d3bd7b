//! Input validation utilities
//!
//! Pure functions over caller-supplied data with no I/O. Every bulk entry
//! point runs these before touching a model, so a rejected input leaves the
//! model unchanged.

pub mod lists;
#[cfg(feature = "alloc")]
pub mod matrix;

pub use lists::{validate_parallel_lengths, validate_scalar};
#[cfg(feature = "alloc")]
pub use lists::validate_unique_labels;
#[cfg(feature = "alloc")]
pub use matrix::{fold_matrix, matrix_layout, validate_symmetric, FoldedMatrix, MatrixLayout};
