//! Configuration for bulk loading and batch evaluation

use bqm_core::constants::DEFAULT_SYMMETRY_TOLERANCE;

/// Configuration for building a model from an input matrix
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    /// Fold any square matrix (`true`) or require a symmetric one (`false`)
    pub fix_format: bool,
    /// Relative tolerance of the symmetry check when `fix_format` is off
    pub symmetry_tolerance: f64,
}

impl LoadConfig {
    /// Config that requires symmetric input
    pub fn strict() -> Self {
        Self::default().with_fix_format(false)
    }

    /// Set the folding mode
    pub fn with_fix_format(mut self, fix_format: bool) -> Self {
        self.fix_format = fix_format;
        self
    }

    /// Set the symmetry tolerance
    pub fn with_symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = tolerance;
        self
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            fix_format: true,
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
        }
    }
}

/// Configuration for evaluating many samples at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Batches at least this large are spread over the rayon pool
    pub parallel_threshold: usize,
}

impl BatchConfig {
    /// Always evaluate sequentially
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    /// Set the batch size from which evaluation goes parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether a batch of `len` samples should run in parallel
    pub fn is_parallel(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 64,
        }
    }
}
