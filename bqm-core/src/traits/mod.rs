//! Abstract interfaces shared by the model implementations
//!
//! Traits are pure interfaces - no concrete implementations.

pub mod element;
pub mod label;
pub mod matrix;
#[cfg(feature = "alloc")]
pub mod store;

pub use element::MatrixElement;
pub use label::Label;
pub use matrix::MatrixView;
#[cfg(feature = "alloc")]
pub use store::QuadraticStore;
