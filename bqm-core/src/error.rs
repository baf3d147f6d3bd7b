//! Error types for model operations

/// Errors that can occur while building, querying or converting a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BqmError {
    /// The same label appears twice inside one interaction key
    DuplicateLabel,
    /// Parallel key and value lists have different lengths
    LengthMismatch,
    /// Input matrix is not square
    NonSquareMatrix,
    /// Matrix dimension does not match the number of labels
    DimensionMismatch,
    /// Matrix is not symmetric within the configured tolerance
    AsymmetricMatrix,
    /// Scalar argument is zero or not finite
    InvalidScalar,
    /// Variable value is not valid for the model's vartype
    InvalidValue,
    /// Interaction key is too long to be expanded between vartypes
    KeyTooLong,
    /// Interchange object does not follow the expected schema
    InvalidSchema,
    /// Vartype cannot be reconciled with the model's vartype
    DomainMismatch,
    /// Label was never added to the model
    UnknownLabel,
    /// Extremum query on a model with no linear terms
    EmptyLinear,
    /// Extremum query on a model with no quadratic terms
    EmptyQuadratic,
    /// Extremum query on a polynomial model with no interactions
    EmptyPolynomial,
}

/// Coarse classification of [`BqmError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed keys, lists, matrices or scalars
    InvalidArgument,
    /// Irreconcilable variable domains
    DomainMismatch,
    /// Reference to a label that is not present
    UnknownLabel,
    /// Query that needs at least one stored entry
    EmptyModel,
}

impl BqmError {
    /// Category this error belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            BqmError::DuplicateLabel
            | BqmError::LengthMismatch
            | BqmError::NonSquareMatrix
            | BqmError::DimensionMismatch
            | BqmError::AsymmetricMatrix
            | BqmError::InvalidScalar
            | BqmError::InvalidValue
            | BqmError::KeyTooLong
            | BqmError::InvalidSchema => ErrorCategory::InvalidArgument,
            BqmError::DomainMismatch => ErrorCategory::DomainMismatch,
            BqmError::UnknownLabel => ErrorCategory::UnknownLabel,
            BqmError::EmptyLinear | BqmError::EmptyQuadratic | BqmError::EmptyPolynomial => {
                ErrorCategory::EmptyModel
            }
        }
    }
}

impl core::fmt::Display for BqmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            BqmError::DuplicateLabel => "Duplicate label within one interaction",
            BqmError::LengthMismatch => "Key and value lists differ in length",
            BqmError::NonSquareMatrix => "Matrix must be square",
            BqmError::DimensionMismatch => "Matrix dimension does not match label count",
            BqmError::AsymmetricMatrix => "Matrix is not symmetric within tolerance",
            BqmError::InvalidScalar => "Scalar must be finite and non-zero",
            BqmError::InvalidValue => "Value is not valid for the vartype",
            BqmError::KeyTooLong => "Interaction key too long to expand",
            BqmError::InvalidSchema => "Invalid interchange schema",
            BqmError::DomainMismatch => "Vartype does not match the model",
            BqmError::UnknownLabel => "Unknown variable label",
            BqmError::EmptyLinear => "Model has no linear terms",
            BqmError::EmptyQuadratic => "Model has no quadratic terms",
            BqmError::EmptyPolynomial => "Model has no interactions",
        };
        write!(f, "{msg}")
    }
}

impl core::error::Error for BqmError {}

/// Result type for model operations
pub type Result<T> = core::result::Result<T, BqmError>;
