//! Interchange definitions
//!
//! Pure data structures for what goes into and comes out of a model:
//! input matrices and the serializable mirrors of both model kinds. No I/O
//! and no encoding; the `bqm` crate renders these through serde.

pub mod constants;
#[cfg(feature = "alloc")]
pub mod interchange;
#[cfg(feature = "alloc")]
pub mod matrix;

#[cfg(feature = "alloc")]
pub use interchange::{BpmSchemaVersion, BqmSchemaVersion, SerializableBqm, SerializablePolynomial};
#[cfg(feature = "alloc")]
pub use matrix::{CooMatrix, DenseMatrix};
