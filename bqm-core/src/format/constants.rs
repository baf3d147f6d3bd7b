//! Interchange constants

/// `type` tag of a serialized quadratic model
pub const BQM_TYPE: &str = "BinaryQuadraticModel";

/// Schema version written for quadratic models
pub const BQM_SCHEMA_VERSION: &str = "3.0.0";

/// Schema version written for quadratic models with dense storage
pub const BQM_DENSE_SCHEMA_VERSION: &str = "3.0.0-dense";

/// `type` tag of a serialized polynomial model
pub const BPM_TYPE: &str = "BinaryPolynomialModel";

/// Schema version written for polynomial models
pub const BPM_SCHEMA_VERSION: &str = "1.0.0";

/// Bias type name recorded in serialized models
pub const BIAS_TYPE: &str = "float64";

/// Largest label count that fits a `uint16` index type
pub const UINT16_INDEX_LIMIT: usize = 65536;

/// Default tolerance for the symmetry check of input matrices
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-10;
