//! Variable label requirements

use core::fmt::Debug;
use core::hash::Hash;

/// Opaque variable identifier
///
/// Labels are only compared, hashed and cloned; their values carry no
/// meaning for the model. Integers, strings and tuples of those qualify.
pub trait Label: Clone + Ord + Hash + Debug {}

impl<T: Clone + Ord + Hash + Debug> Label for T {}
