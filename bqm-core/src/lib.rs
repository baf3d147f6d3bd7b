#![no_std]

//! BQM Core - Binary Quadratic / Polynomial Model Definitions
//!
//! This crate provides the pure definitions shared by every model
//! implementation: the error taxonomy, variable domains and the exact
//! SPIN <-> BINARY algebra, canonical interaction keys, the storage backend
//! trait, input matrices and the interchange format. No I/O and no std
//! collections; the `alloc` feature enables the owned types.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod key;
pub mod traits;
pub mod validation;
pub mod vartype;

pub use error::*;
pub use format::constants;
#[cfg(feature = "alloc")]
pub use format::{
    BpmSchemaVersion, BqmSchemaVersion, CooMatrix, DenseMatrix, SerializableBqm,
    SerializablePolynomial,
};
#[cfg(feature = "alloc")]
pub use key::PolyKey;
pub use key::UnorderedPair;
pub use traits::*;
pub use vartype::{expansion_coefficient, AffineMap, Vartype, MAX_EXPANSION_ARITY};
