//! Variable domains and the exact SPIN <-> BINARY algebra
//!
//! Every coefficient conversion in the workspace goes through this module.
//! The substitution is `s = 2b - 1` (spin `s` in {-1, +1}, binary `b` in
//! {0, 1}), expanded multilinearly so that conversions are exact.

use crate::{BqmError, Result};
use core::fmt;
use core::str::FromStr;

/// Longest interaction key that can be expanded between domains
///
/// Sub-terms of a key are enumerated with a `u64` bit mask.
pub const MAX_EXPANSION_ARITY: usize = 63;

/// Domain of the model variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vartype {
    /// Ising spins, values in {-1, +1}
    #[cfg_attr(feature = "serde", serde(rename = "SPIN"))]
    Spin,
    /// Booleans, values in {0, 1}
    #[cfg_attr(feature = "serde", serde(rename = "BINARY"))]
    Binary,
    /// Unset; only meaningful as "use the model's vartype"
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "NONE"))]
    None,
}

impl Vartype {
    /// Canonical upper-case name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Vartype::Spin => "SPIN",
            Vartype::Binary => "BINARY",
            Vartype::None => "NONE",
        }
    }

    /// The other concrete domain
    pub const fn other(&self) -> Vartype {
        match self {
            Vartype::Spin => Vartype::Binary,
            Vartype::Binary => Vartype::Spin,
            Vartype::None => Vartype::None,
        }
    }

    /// Whether `value` is a legal assignment in this domain
    pub const fn is_valid_value(&self, value: i32) -> bool {
        match self {
            Vartype::Spin => value == 1 || value == -1,
            Vartype::Binary => value == 0 || value == 1,
            Vartype::None => false,
        }
    }

    /// Check `value` against this domain
    pub const fn validate_value(&self, value: i32) -> Result<()> {
        if self.is_valid_value(value) {
            Ok(())
        } else {
            Err(BqmError::InvalidValue)
        }
    }

    /// Map a value of this domain onto the same assignment in `target`
    ///
    /// `0 <-> -1` and `1 <-> 1`.
    pub const fn convert_value(&self, value: i32, target: Vartype) -> Result<i32> {
        if !self.is_valid_value(value) {
            return Err(BqmError::InvalidValue);
        }
        match (*self, target) {
            (Vartype::Spin, Vartype::Binary) => Ok((value + 1) / 2),
            (Vartype::Binary, Vartype::Spin) => Ok(2 * value - 1),
            (from, to) if from as u8 == to as u8 => Ok(value),
            _ => Err(BqmError::DomainMismatch),
        }
    }

    /// Resolve the domain a value should be read in
    ///
    /// `None` means "the model's own domain". A model without a domain can
    /// only accept explicitly tagged values.
    pub const fn resolve(model: Vartype, given: Vartype) -> Result<Vartype> {
        match (model, given) {
            (Vartype::None, Vartype::None) => Err(BqmError::DomainMismatch),
            (model, Vartype::None) => Ok(model),
            (_, given) => Ok(given),
        }
    }
}

impl fmt::Display for Vartype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vartype {
    type Err = BqmError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("SPIN") {
            Ok(Vartype::Spin)
        } else if s.eq_ignore_ascii_case("BINARY") {
            Ok(Vartype::Binary)
        } else if s.eq_ignore_ascii_case("NONE") {
            Ok(Vartype::None)
        } else {
            Err(BqmError::InvalidSchema)
        }
    }
}

/// Coefficient of one sub-term produced by rewriting a monomial
///
/// A monomial `value * prod_{i in K} x_i` with `|K| = arity`, written in
/// `from`, becomes `sum_{S subset K} c_S * prod_{i in S} y_i` in `to`.
/// This returns `c_S` for `|S| = subset_size`:
///
/// * BINARY -> SPIN: `b = (s + 1) / 2`, so `c_S = value / 2^arity`
/// * SPIN -> BINARY: `s = 2b - 1`, so `c_S = value * 2^|S| * (-1)^(arity - |S|)`
///
/// Identical domains keep the monomial as is.
pub fn expansion_coefficient(
    value: f64,
    arity: usize,
    subset_size: usize,
    from: Vartype,
    to: Vartype,
) -> Result<f64> {
    if subset_size > arity {
        return Err(BqmError::InvalidValue);
    }
    if arity > MAX_EXPANSION_ARITY {
        return Err(BqmError::KeyTooLong);
    }
    match (from, to) {
        (Vartype::Binary, Vartype::Spin) => Ok(value / pow2(arity)),
        (Vartype::Spin, Vartype::Binary) => {
            let sign = if (arity - subset_size) % 2 == 0 { 1.0 } else { -1.0 };
            Ok(sign * value * pow2(subset_size))
        }
        (Vartype::None, _) | (_, Vartype::None) => Err(BqmError::DomainMismatch),
        _ => Ok(if subset_size == arity { value } else { 0.0 }),
    }
}

fn pow2(exp: usize) -> f64 {
    // exp <= MAX_EXPANSION_ARITY, exact in f64
    (1u64 << exp) as f64
}

/// Affine rewrite of a quadratic model between domains
///
/// For a variable `i` with bias `h_i` and neighbour sum `N_i = sum_j J_ij`:
///
/// ```text
/// h_i'   = linear * h_i + neighbor * N_i
/// J_ij'  = quadratic * J_ij
/// offset' = offset + offset_linear * sum_i h_i + offset_quadratic * sum_{i<j} J_ij
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    pub linear: f64,
    pub neighbor: f64,
    pub quadratic: f64,
    pub offset_linear: f64,
    pub offset_quadratic: f64,
}

impl AffineMap {
    /// BINARY -> SPIN
    pub const BINARY_TO_SPIN: AffineMap = AffineMap {
        linear: 0.5,
        neighbor: 0.25,
        quadratic: 0.25,
        offset_linear: 0.5,
        offset_quadratic: 0.25,
    };

    /// SPIN -> BINARY
    pub const SPIN_TO_BINARY: AffineMap = AffineMap {
        linear: 2.0,
        neighbor: -2.0,
        quadratic: 4.0,
        offset_linear: -1.0,
        offset_quadratic: 1.0,
    };

    /// Map taking coefficients from `from` to `to`
    ///
    /// Returns `Ok(None)` when the domains already agree.
    pub const fn between(from: Vartype, to: Vartype) -> Result<Option<AffineMap>> {
        match (from, to) {
            (Vartype::Binary, Vartype::Spin) => Ok(Some(Self::BINARY_TO_SPIN)),
            (Vartype::Spin, Vartype::Binary) => Ok(Some(Self::SPIN_TO_BINARY)),
            (Vartype::Spin, Vartype::Spin) | (Vartype::Binary, Vartype::Binary) => Ok(None),
            _ => Err(BqmError::DomainMismatch),
        }
    }

    /// New linear bias of a variable
    #[inline]
    pub fn apply_linear(&self, bias: f64, neighbor_sum: f64) -> f64 {
        self.linear * bias + self.neighbor * neighbor_sum
    }

    /// New coupling value
    #[inline]
    pub fn apply_quadratic(&self, coupling: f64) -> f64 {
        self.quadratic * coupling
    }

    /// Amount added to the offset
    #[inline]
    pub fn offset_delta(&self, linear_sum: f64, quadratic_sum: f64) -> f64 {
        self.offset_linear * linear_sum + self.offset_quadratic * quadratic_sum
    }
}
