//! Numeric element types accepted in input matrices
//!
//! Models always store `f64`; matrices handed to the bulk loaders may hold
//! any of the types below and are widened on read.

/// Trait for types that can appear as matrix elements
///
/// All matrix element types must be:
/// - Copy: Can be copied without allocation
/// - PartialEq: Can be compared for equality
pub trait MatrixElement: Copy + PartialEq + Sized {
    /// The additive identity, used to skip unset entries
    const ZERO: Self;

    /// Widen to the model's coefficient type
    fn to_f64(self) -> f64;

    /// Whether this entry contributes nothing
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl MatrixElement for f32 {
    const ZERO: Self = 0.0;

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl MatrixElement for f64 {
    const ZERO: Self = 0.0;

    fn to_f64(self) -> f64 {
        self
    }
}

impl MatrixElement for i32 {
    const ZERO: Self = 0;

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl MatrixElement for i64 {
    const ZERO: Self = 0;

    fn to_f64(self) -> f64 {
        self as f64
    }
}
