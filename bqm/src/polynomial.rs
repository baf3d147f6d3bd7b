//! Binary polynomial model
//!
//! Terms of any arity are keyed by canonical [`PolyKey`]s. The empty key is
//! the offset and is kept in its own field. Variables are the labels that
//! appear in at least one stored term; an incidence index maps each of them
//! to its terms.
//!
//! Domain changes substitute `s = 2b - 1` (or `b = (s + 1) / 2`) into every
//! monomial, so a term of arity `k` spreads over all `2^k` sub-keys.

use bqm_core::validation::{validate_parallel_lengths, validate_scalar, validate_unique_labels};
use bqm_core::{
    expansion_coefficient, BqmError, Label, PolyKey, QuadraticStore, Result,
    SerializablePolynomial, UnorderedPair, Vartype, MAX_EXPANSION_ARITY,
};
use hashbrown::{HashMap, HashSet};

use crate::config::BatchConfig;
use crate::energy::{batch_energies, sample_value, Sample};
use crate::model::BinaryQuadraticModel;

/// Coefficients keyed by sorted label lists
pub type Polynomial<L> = HashMap<Vec<L>, f64>;

/// Higher-order model over labels `L`
#[derive(Debug, Clone)]
pub struct BinaryPolynomialModel<L: Label> {
    terms: HashMap<PolyKey<L>, f64>,
    incidence: HashMap<L, HashSet<PolyKey<L>>>,
    offset: f64,
    vartype: Vartype,
}

impl<L: Label> Default for BinaryPolynomialModel<L> {
    fn default() -> Self {
        Self::new(Vartype::None)
    }
}

impl<L: Label> BinaryPolynomialModel<L> {
    /// Empty model in `vartype`
    pub fn new(vartype: Vartype) -> Self {
        Self {
            terms: HashMap::new(),
            incidence: HashMap::new(),
            offset: 0.0,
            vartype,
        }
    }

    /// Build a model from `(key, value)` terms written in `vartype`
    pub fn from_polynomial<I>(polynomial: I, vartype: Vartype) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<L>, f64)>,
    {
        if vartype == Vartype::None {
            return Err(BqmError::DomainMismatch);
        }
        let mut model = Self::new(vartype);
        model.add_interactions_from(polynomial, Vartype::None)?;
        Ok(model)
    }

    /// Build a model from parallel key and value lists
    pub fn from_key_value_lists(keys: Vec<Vec<L>>, values: Vec<f64>, vartype: Vartype) -> Result<Self> {
        if vartype == Vartype::None {
            return Err(BqmError::DomainMismatch);
        }
        let mut model = Self::new(vartype);
        model.add_interactions_from_lists(keys, values, Vartype::None)?;
        Ok(model)
    }

    /// BINARY model from higher-order binary coefficients
    pub fn from_hubo<I>(hubo: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<L>, f64)>,
    {
        Self::from_polynomial(hubo, Vartype::Binary)
    }

    /// SPIN model from higher-order Ising coefficients
    pub fn from_hising<I>(hising: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<L>, f64)>,
    {
        Self::from_polynomial(hising, Vartype::Spin)
    }

    /// Rebuild a model from its serializable form
    pub fn from_serializable(serializable: &SerializablePolynomial<L>) -> Result<Self> {
        serializable.validate()?;
        let labels = &serializable.variable_labels;
        validate_unique_labels(labels)?;
        let keys = serializable
            .poly_key_distance_list
            .iter()
            .map(|indices| indices.iter().map(|&i| labels[i].clone()).collect())
            .collect();
        let mut model = Self::from_key_value_lists(
            keys,
            serializable.poly_value_list.clone(),
            serializable.variable_type,
        )?;
        model.add_offset(serializable.offset);
        Ok(model)
    }

    /// Accumulate onto a stored term, dropping it if it cancels to zero
    fn add_term(&mut self, key: PolyKey<L>, value: f64) {
        if key.is_empty() {
            self.offset += value;
            return;
        }
        let total = self.terms.get(&key).copied().unwrap_or(0.0) + value;
        if total == 0.0 {
            self.drop_term(&key);
            return;
        }
        if self.terms.insert(key.clone(), total).is_none() {
            for label in &key {
                self.incidence
                    .entry(label.clone())
                    .or_default()
                    .insert(key.clone());
            }
        }
    }

    /// Remove a stored term and unlink it from its labels
    fn drop_term(&mut self, key: &PolyKey<L>) -> Option<f64> {
        let value = self.terms.remove(key)?;
        for label in key {
            if let Some(keys) = self.incidence.get_mut(label) {
                keys.remove(key);
                if keys.is_empty() {
                    self.incidence.remove(label);
                }
            }
        }
        Some(value)
    }

    /// Add a term written in `source`, expanding it if that differs from
    /// the model's domain
    fn expand_term(&mut self, key: PolyKey<L>, value: f64, source: Vartype) -> Result<()> {
        let to = self.vartype;
        if source == to {
            self.add_term(key, value);
            return Ok(());
        }
        let arity = key.len();
        // rejects over-long keys before anything is added
        expansion_coefficient(value, arity, arity, source, to)?;
        for mask in 0..(1u64 << arity) {
            let sub = key.subset(mask);
            let coefficient = expansion_coefficient(value, arity, sub.len(), source, to)?;
            self.add_term(sub, coefficient);
        }
        Ok(())
    }

    /// Canonicalize keys, checking their arity when they will be expanded
    fn prepare_keys(keys: Vec<Vec<L>>, expand: bool) -> Result<Vec<PolyKey<L>>> {
        let keys = keys
            .into_iter()
            .map(PolyKey::new)
            .collect::<Result<Vec<_>>>()?;
        if expand && keys.iter().any(|key| key.len() > MAX_EXPANSION_ARITY) {
            return Err(BqmError::KeyTooLong);
        }
        Ok(keys)
    }

    /// Add `value` to the term `key`, in the model's domain
    ///
    /// Label order inside `key` does not matter; a repeated label is
    /// rejected and the empty key adds to the offset.
    pub fn add_interaction(&mut self, key: Vec<L>, value: f64) -> Result<()> {
        self.add_interaction_with_vartype(key, value, Vartype::None)
    }

    /// Add `value` to the term `key`, written in `vartype`
    pub fn add_interaction_with_vartype(&mut self, key: Vec<L>, value: f64, vartype: Vartype) -> Result<()> {
        self.add_interactions_from_lists(vec![key], vec![value], vartype)
    }

    /// Add several terms written in `vartype`
    pub fn add_interactions_from<I>(&mut self, polynomial: I, vartype: Vartype) -> Result<()>
    where
        I: IntoIterator<Item = (Vec<L>, f64)>,
    {
        let (keys, values) = polynomial.into_iter().unzip();
        self.add_interactions_from_lists(keys, values, vartype)
    }

    /// Add terms given as parallel key and value lists
    ///
    /// All keys are checked before the first term is applied, so a failed
    /// call leaves the model unchanged.
    pub fn add_interactions_from_lists(&mut self, keys: Vec<Vec<L>>, values: Vec<f64>, vartype: Vartype) -> Result<()> {
        validate_parallel_lengths(keys.len(), values.len())?;
        if keys.is_empty() {
            return Ok(());
        }
        let source = Vartype::resolve(self.vartype, vartype)?;
        let target = match self.vartype {
            Vartype::None => source,
            model => model,
        };
        let keys = Self::prepare_keys(keys, source != target)?;
        self.vartype = target;
        for (key, value) in keys.into_iter().zip(values) {
            self.expand_term(key, value, source)?;
        }
        Ok(())
    }

    /// Drop the term `key`, returning its value (0.0 if it was not stored)
    ///
    /// The empty key clears the offset. Labels left without terms leave
    /// the model.
    pub fn remove_interaction(&mut self, key: Vec<L>) -> Result<f64> {
        let key = PolyKey::new(key)?;
        if key.is_empty() {
            let old = self.offset;
            self.offset = 0.0;
            return Ok(old);
        }
        if key.iter().any(|label| !self.incidence.contains_key(label)) {
            return Err(BqmError::UnknownLabel);
        }
        Ok(self.drop_term(&key).unwrap_or(0.0))
    }

    /// Drop several terms; fails without changes if a key is malformed or
    /// names an unknown label
    pub fn remove_interactions_from<I>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = Vec<L>>,
    {
        let keys = keys
            .into_iter()
            .map(PolyKey::new)
            .collect::<Result<Vec<_>>>()?;
        if keys
            .iter()
            .flatten()
            .any(|label| !self.incidence.contains_key(label))
        {
            return Err(BqmError::UnknownLabel);
        }
        for key in &keys {
            if key.is_empty() {
                self.offset = 0.0;
            } else {
                self.drop_term(key);
            }
        }
        Ok(())
    }

    /// Remove every term containing `label`
    pub fn remove_variable(&mut self, label: &L) -> Result<()> {
        let keys = self.incidence.get(label).ok_or(BqmError::UnknownLabel)?;
        let keys: Vec<PolyKey<L>> = keys.iter().cloned().collect();
        for key in &keys {
            self.drop_term(key);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("Removed variable {:?} with {} terms", label, keys.len());
        Ok(())
    }

    /// Remove several variables; fails without changes if one is unknown
    pub fn remove_variables_from<I>(&mut self, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
    {
        let mut labels: Vec<L> = labels.into_iter().collect();
        labels.sort();
        labels.dedup();
        if labels.iter().any(|label| !self.incidence.contains_key(label)) {
            return Err(BqmError::UnknownLabel);
        }
        for label in &labels {
            // an earlier removal may already have taken the label's terms
            if self.incidence.contains_key(label) {
                self.remove_variable(label)?;
            }
        }
        Ok(())
    }

    pub fn add_offset(&mut self, delta: f64) {
        self.offset += delta;
    }

    pub fn remove_offset(&mut self) {
        self.offset = 0.0;
    }

    /// Remove every term and the offset; the vartype is kept
    pub fn clear(&mut self) {
        self.terms.clear();
        self.incidence.clear();
        self.offset = 0.0;
    }

    /// Multiply every coefficient by `scalar`
    ///
    /// Listed keys keep their value, as does the offset when
    /// `ignore_offset` is set.
    pub fn scale(&mut self, scalar: f64, ignored_interactions: &[Vec<L>], ignore_offset: bool) -> Result<()> {
        validate_scalar(scalar)?;
        let ignored = ignored_interactions
            .iter()
            .map(|key| PolyKey::new(key.clone()))
            .collect::<Result<HashSet<_>>>()?;
        for (key, value) in self.terms.iter_mut() {
            if !ignored.contains(key) {
                *value *= scalar;
            }
        }
        if !ignore_offset {
            self.offset *= scalar;
        }
        Ok(())
    }

    /// Scale so every coefficient fits `range`
    ///
    /// Returns the factor applied; an empty model is left untouched and
    /// reports `1.0`.
    pub fn normalize(&mut self, range: (f64, f64), ignored_interactions: &[Vec<L>], ignore_offset: bool) -> Result<f64> {
        let (Ok(min), Ok(max)) = (self.min_coefficient(), self.max_coefficient()) else {
            return Ok(1.0);
        };
        let inv_scale = (min / range.0).max(max / range.1);
        if inv_scale == 0.0 || !inv_scale.is_finite() {
            return Ok(1.0);
        }
        let factor = 1.0 / inv_scale;
        self.scale(factor, ignored_interactions, ignore_offset)?;
        Ok(factor)
    }

    /// Rewrite every term into `target`, preserving every energy
    ///
    /// Sub-terms that cancel to exactly zero are dropped.
    pub fn change_vartype(&mut self, target: Vartype) -> Result<()> {
        if target == Vartype::None {
            return Err(BqmError::DomainMismatch);
        }
        if self.vartype == Vartype::None {
            self.vartype = target;
            return Ok(());
        }
        if self.vartype == target {
            return Ok(());
        }
        if self.degree() > MAX_EXPANSION_ARITY {
            return Err(BqmError::KeyTooLong);
        }

        let source = self.vartype;
        let terms = std::mem::take(&mut self.terms);
        self.incidence.clear();
        self.vartype = target;
        let mut expanded: HashMap<PolyKey<L>, f64> = HashMap::with_capacity(terms.len());
        for (key, value) in terms {
            let arity = key.len();
            for mask in 0..(1u64 << arity) {
                let sub = key.subset(mask);
                let coefficient = expansion_coefficient(value, arity, sub.len(), source, target)?;
                *expanded.entry(sub).or_insert(0.0) += coefficient;
            }
        }
        for (key, value) in expanded {
            self.add_term(key, value);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Converted {} terms from {} to {}",
            self.terms.len(),
            source,
            target
        );
        Ok(())
    }

    /// Copy of the model expressed in `target`
    pub fn to_vartype(&self, target: Vartype) -> Result<Self> {
        let mut model = self.clone();
        model.change_vartype(target)?;
        Ok(model)
    }

    pub fn vartype(&self) -> Vartype {
        self.vartype
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Coefficient of `key` (the offset for the empty key)
    pub fn get_polynomial(&self, key: Vec<L>) -> Result<f64> {
        let key = PolyKey::new(key)?;
        if key.is_empty() {
            return Ok(self.offset);
        }
        if key.iter().any(|label| !self.incidence.contains_key(label)) {
            return Err(BqmError::UnknownLabel);
        }
        Ok(self.terms.get(&key).copied().unwrap_or(0.0))
    }

    /// All stored terms keyed by sorted label lists
    pub fn polynomial(&self) -> Polynomial<L> {
        self.terms
            .iter()
            .map(|(key, &value)| (key.as_slice().to_vec(), value))
            .collect()
    }

    /// Stored terms ordered by arity, then by labels
    fn sorted_terms(&self) -> Vec<(&PolyKey<L>, f64)> {
        let mut terms: Vec<(&PolyKey<L>, f64)> = self.terms.iter().map(|(k, &v)| (k, v)).collect();
        terms.sort_by(|a, b| (a.0.len(), a.0).cmp(&(b.0.len(), b.0)));
        terms
    }

    /// Keys of the stored terms, parallel to [`Self::value_list`]
    pub fn key_list(&self) -> Vec<Vec<L>> {
        self.sorted_terms()
            .into_iter()
            .map(|(key, _)| key.as_slice().to_vec())
            .collect()
    }

    /// Values of the stored terms, parallel to [`Self::key_list`]
    pub fn value_list(&self) -> Vec<f64> {
        self.sorted_terms().into_iter().map(|(_, v)| v).collect()
    }

    /// Labels appearing in at least one term, sorted
    pub fn variables(&self) -> Vec<L> {
        let mut labels: Vec<L> = self.incidence.keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn has_variable(&self, label: &L) -> bool {
        self.incidence.contains_key(label)
    }

    pub fn num_variables(&self) -> usize {
        self.incidence.len()
    }

    pub fn num_interactions(&self) -> usize {
        self.terms.len()
    }

    /// Largest key arity, 0 for a model without terms
    pub fn degree(&self) -> usize {
        self.terms.keys().map(PolyKey::len).max().unwrap_or(0)
    }

    /// For every label, the other labels of each of its terms with the
    /// term's coefficient
    pub fn adjacency(&self) -> HashMap<L, Polynomial<L>> {
        self.incidence
            .iter()
            .map(|(label, keys)| {
                let row = keys
                    .iter()
                    .filter_map(|key| {
                        let rest = key.without(label)?;
                        Some((rest.into_vec(), *self.terms.get(key)?))
                    })
                    .collect();
                (label.clone(), row)
            })
            .collect()
    }

    pub fn min_coefficient(&self) -> Result<f64> {
        self.terms
            .values()
            .copied()
            .reduce(f64::min)
            .ok_or(BqmError::EmptyPolynomial)
    }

    pub fn max_coefficient(&self) -> Result<f64> {
        self.terms
            .values()
            .copied()
            .reduce(f64::max)
            .ok_or(BqmError::EmptyPolynomial)
    }

    /// Energy of one assignment; every variable must be assigned
    pub fn energy(&self, sample: &Sample<L>) -> Result<f64> {
        if self.vartype == Vartype::None {
            return Err(BqmError::DomainMismatch);
        }
        for label in self.incidence.keys() {
            sample_value(sample, label, self.vartype)?;
        }
        let mut energy = self.offset;
        for (key, value) in &self.terms {
            let mut product = *value;
            for label in key {
                product *= sample_value(sample, label, self.vartype)?;
            }
            energy += product;
        }
        Ok(energy)
    }

    /// Higher-order binary form and offset
    pub fn to_hubo(&self) -> Result<(Polynomial<L>, f64)> {
        let binary = self.to_vartype(Vartype::Binary)?;
        Ok((binary.polynomial(), binary.offset))
    }

    /// Higher-order Ising form and offset
    pub fn to_hising(&self) -> Result<(Polynomial<L>, f64)> {
        let spin = self.to_vartype(Vartype::Spin)?;
        Ok((spin.polynomial(), spin.offset))
    }

    /// Serializable form with labels sorted and keys as label positions
    pub fn to_serializable(&self) -> SerializablePolynomial<L> {
        let labels = self.variables();
        let position: HashMap<&L, usize> = labels.iter().enumerate().map(|(i, l)| (l, i)).collect();
        let mut keys = Vec::with_capacity(self.terms.len());
        let mut values = Vec::with_capacity(self.terms.len());
        for (key, value) in self.sorted_terms() {
            keys.push(key.iter().filter_map(|l| position.get(l).copied()).collect());
            values.push(value);
        }
        SerializablePolynomial::new(labels.clone(), keys, values, self.offset, self.vartype)
    }
}

impl<L: Label + Send + Sync> BinaryPolynomialModel<L> {
    /// Energies of many assignments, in input order
    pub fn energies(&self, samples: &[Sample<L>]) -> Result<Vec<f64>> {
        self.energies_with(samples, &BatchConfig::default())
    }

    pub fn energies_with(&self, samples: &[Sample<L>], config: &BatchConfig) -> Result<Vec<f64>> {
        batch_energies(samples, config, |sample| self.energy(sample))
    }
}

impl<L: Label, S: QuadraticStore<L>> From<&BinaryQuadraticModel<L, S>> for BinaryPolynomialModel<L> {
    fn from(bqm: &BinaryQuadraticModel<L, S>) -> Self {
        let mut model = Self::new(bqm.vartype());
        for (label, bias) in bqm.linear() {
            model.add_term(PolyKey::from(UnorderedPair::new(label.clone(), label)), bias);
        }
        for ((u, v), coupling) in bqm.quadratic() {
            model.add_term(PolyKey::from(UnorderedPair::new(u, v)), coupling);
        }
        model.offset = bqm.offset();
        model
    }
}
