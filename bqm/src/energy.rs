//! Sample evaluation shared by the quadratic and polynomial models

use bqm_core::{BqmError, Label, Result, Vartype};
use hashbrown::HashMap;
use rayon::prelude::*;

use crate::config::BatchConfig;

/// One assignment of values to labels
///
/// Values are `-1`/`+1` for SPIN models and `0`/`1` for BINARY models.
pub type Sample<L> = HashMap<L, i32>;

/// Value of `label` in `sample`, checked against `vartype`
pub(crate) fn sample_value<L: Label>(sample: &Sample<L>, label: &L, vartype: Vartype) -> Result<f64> {
    let value = *sample.get(label).ok_or(BqmError::UnknownLabel)?;
    vartype.validate_value(value)?;
    Ok(f64::from(value))
}

/// Evaluate `energy` over `samples`, in input order
///
/// Large batches are fanned out over the rayon pool; the first error
/// encountered is returned.
pub(crate) fn batch_energies<L, F>(samples: &[Sample<L>], config: &BatchConfig, energy: F) -> Result<Vec<f64>>
where
    L: Label + Send + Sync,
    F: Fn(&Sample<L>) -> Result<f64> + Sync,
{
    if config.is_parallel(samples.len()) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Evaluating {} samples in parallel", samples.len());
        samples.par_iter().map(&energy).collect()
    } else {
        samples.iter().map(energy).collect()
    }
}
