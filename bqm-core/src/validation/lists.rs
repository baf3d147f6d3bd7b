//! Validation of scalar and list arguments

use crate::{BqmError, Result};

/// Parallel key/value lists must have the same length
pub const fn validate_parallel_lengths(keys: usize, values: usize) -> Result<()> {
    if keys != values {
        return Err(BqmError::LengthMismatch);
    }
    Ok(())
}

/// Scaling factors must be finite and non-zero
pub fn validate_scalar(scalar: f64) -> Result<()> {
    if scalar == 0.0 || !scalar.is_finite() {
        return Err(BqmError::InvalidScalar);
    }
    Ok(())
}

/// A label vector must not repeat a label
#[cfg(feature = "alloc")]
pub fn validate_unique_labels<L: Ord>(labels: &[L]) -> Result<()> {
    let mut sorted: alloc::vec::Vec<&L> = labels.iter().collect();
    sorted.sort();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(BqmError::DuplicateLabel);
    }
    Ok(())
}
