//! BQM - Binary Quadratic and Polynomial Models
//!
//! This library stores optimization problems over binary variables: linear
//! biases, pairwise couplings (or couplings of any arity), and an offset,
//! in either the SPIN `{-1, +1}` or the BINARY `{0, 1}` domain.
//!
//! ## Architecture
//!
//! BQM follows the same definition/implementation split as its core crate:
//!
//! - **bqm-core**: Errors, vartype algebra, keys, storage traits and the
//!   interchange format (`no_std`, no I/O)
//! - **bqm**: Label index, dense and sparse stores, the model types, batch
//!   evaluation and JSON interchange
//!
//! ## Quick Start
//!
//! ```rust
//! use bqm::{SparseBqm, Vartype};
//!
//! fn example() -> bqm::Result<()> {
//!     let mut bqm = SparseBqm::new(Vartype::Spin);
//!     bqm.add_interaction(0, 1, 2.0)?;
//!     bqm.add_interaction(1, 2, -1.0)?;
//!     bqm.add_variable(0, 0.5)?;
//!     bqm.add_offset(3.0);
//!
//!     // Same energies, BINARY coefficients
//!     let qubo = bqm.to_vartype(Vartype::Binary)?;
//!     assert_eq!(qubo.get_quadratic(&0, &1)?, 8.0);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Dual storage**: `DenseBqm` (matrix, index-compacted) and `SparseBqm`
//!   (label-keyed maps) behind one `QuadraticStore` trait
//! - **Exact domain conversion**: SPIN <-> BINARY rewrites preserve every
//!   energy, for pairwise and higher-order terms
//! - **Bulk loading**: dense or COO matrices with symmetric folding
//! - **Interchange**: serializable mirrors and JSON (`serde` feature)
//! - **Logging**: `tracing` debug events (`tracing` feature)

// Re-export core abstractions and format definitions
pub use bqm_core::{
    // Core traits
    Label, MatrixElement, MatrixView, QuadraticStore,
    // Domains and keys
    expansion_coefficient, AffineMap, PolyKey, UnorderedPair, Vartype,
    // Format definitions
    CooMatrix, DenseMatrix, SerializableBqm, SerializablePolynomial,
    // Error handling
    BqmError, ErrorCategory, Result,
};

// Implementation modules
pub mod config;
pub mod dense;
pub mod energy;
#[cfg(feature = "serde")]
pub mod interchange;
pub mod label_index;
pub mod model;
pub mod polynomial;
pub mod sparse;

// Public exports
pub use config::{BatchConfig, LoadConfig};
pub use dense::DenseStore;
pub use energy::Sample;
pub use label_index::LabelIndex;
pub use model::{Adjacency, BinaryQuadraticModel, DenseBqm, Linear, Quadratic, SparseBqm};
pub use polynomial::{BinaryPolynomialModel, Polynomial};
pub use sparse::SparseStore;

#[cfg(feature = "serde")]
pub use interchange::InterchangeError;
