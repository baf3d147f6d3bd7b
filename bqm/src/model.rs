//! Binary quadratic model
//!
//! [`BinaryQuadraticModel`] combines a storage backend, a scalar offset and
//! the variable domain. Every stored coefficient is expressed in the model's
//! domain; values tagged with the other domain are rewritten exactly on the
//! way in, and [`BinaryQuadraticModel::change_vartype`] rewrites the whole
//! model through [`AffineMap`].
//!
//! The backend is a type parameter. [`SparseBqm`] keys everything by label,
//! [`DenseBqm`] keeps a symmetric matrix addressed through a label index.

use std::marker::PhantomData;

use bqm_core::validation::{fold_matrix, validate_scalar, validate_symmetric, validate_unique_labels};
use bqm_core::{
    expansion_coefficient, AffineMap, BqmError, DenseMatrix, Label, MatrixView, QuadraticStore,
    Result, SerializableBqm, Vartype,
};
use hashbrown::{HashMap, HashSet};

use crate::config::{BatchConfig, LoadConfig};
use crate::dense::DenseStore;
use crate::energy::{batch_energies, sample_value, Sample};
use crate::sparse::SparseStore;

/// Linear biases keyed by label
pub type Linear<L> = HashMap<L, f64>;

/// Couplings keyed by `(low, high)` label pairs
pub type Quadratic<L> = HashMap<(L, L), f64>;

/// Label to `{neighbour: coupling}`
pub type Adjacency<L> = HashMap<L, HashMap<L, f64>>;

/// Quadratic model over labels `L`, stored in backend `S`
#[derive(Debug, Clone)]
pub struct BinaryQuadraticModel<L: Label, S: QuadraticStore<L> = SparseStore<L>> {
    store: S,
    offset: f64,
    vartype: Vartype,
    _labels: PhantomData<L>,
}

/// Model backed by [`DenseStore`]
pub type DenseBqm<L> = BinaryQuadraticModel<L, DenseStore<L>>;

/// Model backed by [`SparseStore`]
pub type SparseBqm<L> = BinaryQuadraticModel<L, SparseStore<L>>;

impl<L: Label, S: QuadraticStore<L>> BinaryQuadraticModel<L, S> {
    /// Empty model in `vartype`
    ///
    /// A model created with [`Vartype::None`] only accepts tagged values
    /// and takes the domain of the first one it receives.
    pub fn new(vartype: Vartype) -> Self {
        Self {
            store: S::default(),
            offset: 0.0,
            vartype,
            _labels: PhantomData,
        }
    }

    /// Empty model with the same backend and vartype
    pub fn empty(&self) -> Self {
        Self::new(self.vartype)
    }

    /// Build a model from linear and quadratic terms in `vartype`
    pub fn from_parts<I, Q>(linear: I, quadratic: Q, offset: f64, vartype: Vartype) -> Result<Self>
    where
        I: IntoIterator<Item = (L, f64)>,
        Q: IntoIterator<Item = ((L, L), f64)>,
    {
        require_domain(vartype)?;
        let mut model = Self::new(vartype);
        model.add_variables_from(linear)?;
        model.add_interactions_from(quadratic)?;
        model.add_offset(offset);
        Ok(model)
    }

    /// Build a model from a square interaction matrix
    ///
    /// `matrix` is `n x n` (diagonal = linear biases) or `(n + 1) x (n + 1)`
    /// (last row and column = linear biases, corner ignored) for
    /// `n = labels.len()`. Row/column `i` belongs to `labels[i]`. The model
    /// energy equals `x^T M x`: off-diagonal entries are folded into one
    /// coupling `M[i][j] + M[j][i]`. With `config.fix_format` off the matrix
    /// must be symmetric within `config.symmetry_tolerance`.
    pub fn from_matrix<M: MatrixView>(
        matrix: &M,
        labels: Vec<L>,
        offset: f64,
        vartype: Vartype,
        config: &LoadConfig,
    ) -> Result<Self> {
        require_domain(vartype)?;
        validate_unique_labels(&labels)?;
        if !config.fix_format {
            validate_symmetric(matrix, config.symmetry_tolerance)?;
        }
        let folded = fold_matrix(matrix, labels.len())?;

        let mut model = Self::new(vartype);
        model.store.extend_labels(labels.iter().cloned());
        for (label, bias) in labels.iter().zip(folded.linear) {
            model.store.set_linear(label.clone(), bias);
        }
        for (i, j, coupling) in folded.couplings {
            model
                .store
                .set_quadratic(labels[i].clone(), labels[j].clone(), coupling);
        }
        model.add_offset(offset);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Loaded {} variables and {} interactions from a {:?} matrix",
            model.num_variables(),
            model.num_interactions(),
            matrix.dimensions()
        );
        Ok(model)
    }

    /// BINARY model from QUBO coefficients; `(u, u)` keys are linear biases
    pub fn from_qubo<Q>(qubo: Q, offset: f64) -> Self
    where
        Q: IntoIterator<Item = ((L, L), f64)>,
    {
        let mut model = Self::new(Vartype::Binary);
        for ((u, v), bias) in qubo {
            model.store.add_quadratic(u, v, bias);
        }
        model.add_offset(offset);
        model
    }

    /// SPIN model from Ising fields and couplings
    pub fn from_ising<H, J>(h: H, j: J, offset: f64) -> Self
    where
        H: IntoIterator<Item = (L, f64)>,
        J: IntoIterator<Item = ((L, L), f64)>,
    {
        let mut model = Self::new(Vartype::Spin);
        for (label, bias) in h {
            model.store.add_linear(label, bias);
        }
        for ((u, v), bias) in j {
            model.store.add_quadratic(u, v, bias);
        }
        model.add_offset(offset);
        model
    }

    /// Rebuild a model from its serializable form
    pub fn from_serializable(serializable: &SerializableBqm<L>) -> Result<Self> {
        serializable.validate()?;
        let labels = &serializable.variable_labels;
        validate_unique_labels(labels)?;

        let mut model = Self::new(serializable.variable_type);
        model.store.extend_labels(labels.iter().cloned());
        for (label, &bias) in labels.iter().zip(&serializable.linear_biases) {
            model.store.set_linear(label.clone(), bias);
        }
        for (head, tail, bias) in serializable.quadratic_triplets() {
            model
                .store
                .add_quadratic(labels[head].clone(), labels[tail].clone(), bias);
        }
        model.add_offset(serializable.offset);
        Ok(model)
    }

    /// Domain the value of an add should be read in, adopting it if the
    /// model has none yet
    fn source_domain(&mut self, given: Vartype) -> Result<Vartype> {
        let source = Vartype::resolve(self.vartype, given)?;
        if self.vartype == Vartype::None {
            self.vartype = source;
        }
        Ok(source)
    }

    fn shift_offset(&mut self, delta: f64) {
        self.offset += delta;
        self.store.sync_offset(self.offset);
    }

    /// Accumulate a linear term written in `source`
    fn accumulate_linear(&mut self, label: L, bias: f64, source: Vartype) -> Result<()> {
        if source == self.vartype {
            self.store.add_linear(label, bias);
            return Ok(());
        }
        let to = self.vartype;
        self.store
            .add_linear(label, expansion_coefficient(bias, 1, 1, source, to)?);
        self.shift_offset(expansion_coefficient(bias, 1, 0, source, to)?);
        Ok(())
    }

    /// Accumulate a pair term written in `source`
    fn accumulate_quadratic(&mut self, u: L, v: L, bias: f64, source: Vartype) -> Result<()> {
        if u == v {
            return self.accumulate_linear(u, bias, source);
        }
        if source == self.vartype {
            self.store.add_quadratic(u, v, bias);
            return Ok(());
        }
        let to = self.vartype;
        let pair = expansion_coefficient(bias, 2, 2, source, to)?;
        let single = expansion_coefficient(bias, 2, 1, source, to)?;
        let constant = expansion_coefficient(bias, 2, 0, source, to)?;
        self.store.add_linear(u.clone(), single);
        self.store.add_linear(v.clone(), single);
        self.store.add_quadratic(u, v, pair);
        self.shift_offset(constant);
        Ok(())
    }

    /// Add `bias` to the linear term of `label`, in the model's domain
    pub fn add_variable(&mut self, label: L, bias: f64) -> Result<()> {
        self.add_variable_with_vartype(label, bias, Vartype::None)
    }

    /// Add `bias` to the linear term of `label`, written in `vartype`
    pub fn add_variable_with_vartype(&mut self, label: L, bias: f64, vartype: Vartype) -> Result<()> {
        let source = self.source_domain(vartype)?;
        self.accumulate_linear(label, bias, source)
    }

    /// Add several linear terms in the model's domain
    pub fn add_variables_from<I>(&mut self, linear: I) -> Result<()>
    where
        I: IntoIterator<Item = (L, f64)>,
    {
        let linear: Vec<(L, f64)> = linear.into_iter().collect();
        if linear.is_empty() {
            return Ok(());
        }
        let source = self.source_domain(Vartype::None)?;
        for (label, bias) in linear {
            self.accumulate_linear(label, bias, source)?;
        }
        Ok(())
    }

    /// Add `bias` to the coupling of `u` and `v`, in the model's domain
    ///
    /// `u == v` adds to the linear term instead.
    pub fn add_interaction(&mut self, u: L, v: L, bias: f64) -> Result<()> {
        self.add_interaction_with_vartype(u, v, bias, Vartype::None)
    }

    /// Add `bias` to the coupling of `u` and `v`, written in `vartype`
    ///
    /// A value in the other domain is expanded exactly into a coupling,
    /// two linear terms and a constant.
    pub fn add_interaction_with_vartype(&mut self, u: L, v: L, bias: f64, vartype: Vartype) -> Result<()> {
        let source = self.source_domain(vartype)?;
        self.accumulate_quadratic(u, v, bias, source)
    }

    /// Add several couplings in the model's domain
    ///
    /// Repeated pairs accumulate in iteration order.
    pub fn add_interactions_from<Q>(&mut self, quadratic: Q) -> Result<()>
    where
        Q: IntoIterator<Item = ((L, L), f64)>,
    {
        let (keys, values) = quadratic.into_iter().unzip();
        self.add_interactions_from_lists(keys, values, Vartype::None)
    }

    /// Add couplings given as parallel key and value lists
    ///
    /// Everything is checked before the first term is applied, so a failed
    /// call leaves the model unchanged.
    pub fn add_interactions_from_lists(&mut self, keys: Vec<(L, L)>, values: Vec<f64>, vartype: Vartype) -> Result<()> {
        bqm_core::validation::validate_parallel_lengths(keys.len(), values.len())?;
        if keys.is_empty() {
            return Ok(());
        }
        let source = self.source_domain(vartype)?;
        let labels = keys.iter().flat_map(|(u, v)| [u.clone(), v.clone()]);
        self.store.extend_labels(labels);
        for ((u, v), bias) in keys.into_iter().zip(values) {
            self.accumulate_quadratic(u, v, bias, source)?;
        }
        Ok(())
    }

    /// Overwrite the coupling of `u` and `v` (the linear term if `u == v`)
    pub fn set_quadratic(&mut self, u: L, v: L, value: f64) -> Result<()> {
        require_domain(self.vartype)?;
        self.store.set_quadratic(u, v, value);
        Ok(())
    }

    /// Remove `label` and every coupling touching it
    pub fn remove_variable(&mut self, label: &L) -> Result<()> {
        self.store.delete_label(label)?;
        #[cfg(feature = "tracing")]
        tracing::debug!("Removed variable {:?}, {} left", label, self.num_variables());
        Ok(())
    }

    /// Remove several labels; fails without changes if one is unknown
    pub fn remove_variables_from<I>(&mut self, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
    {
        let mut labels: Vec<L> = labels.into_iter().collect();
        labels.sort();
        labels.dedup();
        if labels.iter().any(|label| !self.store.contains(label)) {
            return Err(BqmError::UnknownLabel);
        }
        for label in &labels {
            self.store.delete_label(label)?;
        }
        Ok(())
    }

    /// Drop the coupling of `u` and `v`, returning its value
    ///
    /// Both labels stay in the model.
    pub fn remove_interaction(&mut self, u: &L, v: &L) -> Result<f64> {
        self.store.remove_quadratic(u, v)
    }

    /// Drop several couplings; fails without changes if a label is unknown
    pub fn remove_interactions_from<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (L, L)>,
    {
        let pairs: Vec<(L, L)> = pairs.into_iter().collect();
        if pairs
            .iter()
            .any(|(u, v)| !self.store.contains(u) || !self.store.contains(v))
        {
            return Err(BqmError::UnknownLabel);
        }
        for (u, v) in &pairs {
            self.store.remove_quadratic(u, v)?;
        }
        Ok(())
    }

    pub fn add_offset(&mut self, delta: f64) {
        self.shift_offset(delta);
    }

    /// Reset the offset to zero
    pub fn remove_offset(&mut self) {
        self.offset = 0.0;
        self.store.sync_offset(0.0);
    }

    /// Multiply all coefficients by `scalar`
    ///
    /// Listed variables and interactions keep their value, as does the
    /// offset when `ignore_offset` is set. Unknown labels in the ignore
    /// lists are skipped.
    pub fn scale(
        &mut self,
        scalar: f64,
        ignored_variables: &[L],
        ignored_interactions: &[(L, L)],
        ignore_offset: bool,
    ) -> Result<()> {
        validate_scalar(scalar)?;
        let kept_linear: Vec<(L, f64)> = ignored_variables
            .iter()
            .filter_map(|label| Some((label.clone(), self.store.linear(label).ok()?)))
            .collect();
        let kept_quadratic: Vec<(L, L, f64)> = ignored_interactions
            .iter()
            .filter(|(u, v)| u != v)
            .filter_map(|(u, v)| {
                let coupling = self.store.quadratic(u, v).ok()?;
                (coupling != 0.0).then(|| (u.clone(), v.clone(), coupling))
            })
            .collect();

        self.store.scale(scalar);
        for (label, bias) in kept_linear {
            self.store.set_linear(label, bias);
        }
        for (u, v, coupling) in kept_quadratic {
            self.store.set_quadratic(u, v, coupling);
        }
        if !ignore_offset {
            self.offset *= scalar;
        }
        self.store.sync_offset(self.offset);
        Ok(())
    }

    /// Scale so every linear bias fits `bias_range` and every coupling fits
    /// `quadratic_range` (defaults to `bias_range`)
    ///
    /// Returns the factor applied; an all-zero model is left untouched and
    /// reports `1.0`.
    pub fn normalize(
        &mut self,
        bias_range: (f64, f64),
        quadratic_range: Option<(f64, f64)>,
        ignored_variables: &[L],
        ignored_interactions: &[(L, L)],
        ignore_offset: bool,
    ) -> Result<f64> {
        let quadratic_range = quadratic_range.unwrap_or(bias_range);
        let candidates = [
            self.store.min_linear().ok().map(|v| v / bias_range.0),
            self.store.max_linear().ok().map(|v| v / bias_range.1),
            self.store.min_quadratic().ok().map(|v| v / quadratic_range.0),
            self.store.max_quadratic().ok().map(|v| v / quadratic_range.1),
        ];
        let inv_scale = candidates
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        if inv_scale == 0.0 {
            return Ok(1.0);
        }
        let factor = 1.0 / inv_scale;
        self.scale(factor, ignored_variables, ignored_interactions, ignore_offset)?;
        Ok(factor)
    }

    /// Substitute `value` for `label` and remove it
    ///
    /// Couplings fold into the neighbours' linear terms and the label's own
    /// bias into the offset.
    pub fn fix_variable(&mut self, label: &L, value: i32) -> Result<()> {
        self.vartype.validate_value(value)?;
        let bias = self.store.linear(label)?;
        let value = f64::from(value);

        let mut neighbors = Vec::new();
        self.store
            .for_each_neighbor(label, |other, coupling| neighbors.push((other.clone(), coupling)))?;
        for (other, coupling) in neighbors {
            self.store.add_linear(other, value * coupling);
        }
        self.shift_offset(value * bias);
        self.store.delete_label(label)
    }

    /// Fix several variables; all values and labels are checked first
    pub fn fix_variables<I>(&mut self, fixed: I) -> Result<()>
    where
        I: IntoIterator<Item = (L, i32)>,
    {
        let fixed: Vec<(L, i32)> = fixed.into_iter().collect();
        let mut seen = HashSet::with_capacity(fixed.len());
        for (label, value) in &fixed {
            self.vartype.validate_value(*value)?;
            if !self.store.contains(label) {
                return Err(BqmError::UnknownLabel);
            }
            if !seen.insert(label) {
                return Err(BqmError::DuplicateLabel);
            }
        }
        for (label, value) in &fixed {
            self.fix_variable(label, *value)?;
        }
        Ok(())
    }

    /// Replace `label` by its complement, keeping every energy
    ///
    /// SPIN: `s -> -s`. BINARY: `x -> 1 - x`.
    pub fn flip_variable(&mut self, label: &L) -> Result<()> {
        let bias = self.store.linear(label)?;
        let mut neighbors = Vec::new();
        self.store
            .for_each_neighbor(label, |other, coupling| neighbors.push((other.clone(), coupling)))?;

        match self.vartype {
            Vartype::Spin => {}
            Vartype::Binary => {
                // h x -> h - h x, Q x y -> Q y - Q x y
                self.shift_offset(bias);
                for (other, coupling) in &neighbors {
                    self.store.add_linear(other.clone(), *coupling);
                }
            }
            Vartype::None => return Err(BqmError::DomainMismatch),
        }
        self.store.set_linear(label.clone(), -bias);
        for (other, coupling) in neighbors {
            self.store.set_quadratic(label.clone(), other, -coupling);
        }
        Ok(())
    }

    /// Rewrite the model into `target`, preserving every energy
    pub fn change_vartype(&mut self, target: Vartype) -> Result<()> {
        require_domain(target)?;
        if self.vartype == Vartype::None {
            self.vartype = target;
            return Ok(());
        }
        if let Some(map) = AffineMap::between(self.vartype, target)? {
            let delta = self.store.apply_affine(&map);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Converted {} variables from {} to {}",
                self.num_variables(),
                self.vartype,
                target
            );
            self.vartype = target;
            self.shift_offset(delta);
        }
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

    pub fn num_variables(&self) -> usize {
        self.store.num_variables()
    }

    /// Number of non-zero couplings
    pub fn num_interactions(&self) -> usize {
        self.store.num_interactions()
    }

    pub fn contains(&self, label: &L) -> bool {
        self.store.contains(label)
    }

    /// Labels in storage order
    pub fn variables(&self) -> Vec<L> {
        self.store.variables()
    }

    pub fn sorted_variables(&self) -> Vec<L> {
        let mut labels = self.store.variables();
        labels.sort();
        labels
    }

    pub fn get_linear(&self, label: &L) -> Result<f64> {
        self.store.linear(label)
    }

    pub fn get_quadratic(&self, u: &L, v: &L) -> Result<f64> {
        self.store.quadratic(u, v)
    }

    /// Non-zero linear biases
    pub fn linear(&self) -> Linear<L> {
        let mut linear = Linear::with_capacity(self.num_variables());
        self.store.for_each_linear(|label, bias| {
            if bias != 0.0 {
                linear.insert(label.clone(), bias);
            }
        });
        linear
    }

    /// Non-zero couplings keyed by `(low, high)`
    pub fn quadratic(&self) -> Quadratic<L> {
        let mut quadratic = Quadratic::new();
        self.store.for_each_quadratic(|u, v, coupling| {
            quadratic.insert(ordered(u, v), coupling);
        });
        quadratic
    }

    /// Neighbours of every label; isolated labels map to an empty set
    pub fn adjacency(&self) -> Adjacency<L> {
        let mut adjacency: Adjacency<L> = self
            .store
            .variables()
            .into_iter()
            .map(|label| (label, HashMap::new()))
            .collect();
        self.store.for_each_quadratic(|u, v, coupling| {
            if let Some(row) = adjacency.get_mut(u) {
                row.insert(v.clone(), coupling);
            }
            if let Some(row) = adjacency.get_mut(v) {
                row.insert(u.clone(), coupling);
            }
        });
        adjacency
    }

    /// Number of non-zero couplings touching `label`
    pub fn degree(&self, label: &L) -> Result<usize> {
        self.store.degree(label)
    }

    pub fn min_linear(&self) -> Result<f64> {
        self.store.min_linear()
    }

    pub fn max_linear(&self) -> Result<f64> {
        self.store.max_linear()
    }

    pub fn min_quadratic(&self) -> Result<f64> {
        self.store.min_quadratic()
    }

    pub fn max_quadratic(&self) -> Result<f64> {
        self.store.max_quadratic()
    }

    /// Energy of one assignment
    ///
    /// Every model label must be assigned a value valid for the vartype;
    /// extra labels in `sample` are ignored.
    pub fn energy(&self, sample: &Sample<L>) -> Result<f64> {
        require_domain(self.vartype)?;
        let vartype = self.vartype;
        let mut energy = self.offset;
        let mut failure = None;
        self.store
            .for_each_linear(|label, bias| match sample_value(sample, label, vartype) {
                Ok(x) => energy += bias * x,
                Err(e) => {
                    failure.get_or_insert(e);
                }
            });
        if let Some(e) = failure {
            return Err(e);
        }
        // every label was checked above
        self.store.for_each_quadratic(|u, v, coupling| {
            if let (Some(&x), Some(&y)) = (sample.get(u), sample.get(v)) {
                energy += coupling * f64::from(x) * f64::from(y);
            }
        });
        Ok(energy)
    }

    /// QUBO form: couplings plus `(u, u)` linear entries, and the offset
    pub fn to_qubo(&self) -> Result<(Quadratic<L>, f64)> {
        let binary = self.to_vartype(Vartype::Binary)?;
        let mut qubo = binary.quadratic();
        for (label, bias) in binary.linear() {
            qubo.insert((label.clone(), label), bias);
        }
        Ok((qubo, binary.offset))
    }

    /// Ising form: fields, couplings and the offset
    pub fn to_ising(&self) -> Result<(Linear<L>, Quadratic<L>, f64)> {
        let spin = self.to_vartype(Vartype::Spin)?;
        Ok((spin.linear(), spin.quadratic(), spin.offset))
    }

    /// Same model in another backend
    pub fn convert<S2: QuadraticStore<L>>(&self) -> BinaryQuadraticModel<L, S2> {
        let mut model = BinaryQuadraticModel::<L, S2>::new(self.vartype);
        model.store.extend_labels(self.store.variables());
        self.store
            .for_each_linear(|label, bias| model.store.set_linear(label.clone(), bias));
        self.store
            .for_each_quadratic(|u, v, coupling| model.store.set_quadratic(u.clone(), v.clone(), coupling));
        model.shift_offset(self.offset);
        model
    }

    pub fn to_dense(&self) -> DenseBqm<L> {
        self.convert()
    }

    pub fn to_sparse(&self) -> SparseBqm<L> {
        self.convert()
    }

    /// Serializable form with labels sorted
    pub fn to_serializable(&self) -> SerializableBqm<L> {
        let labels = self.sorted_variables();
        let position: HashMap<&L, usize> = labels.iter().enumerate().map(|(i, l)| (l, i)).collect();

        let mut linear_biases = vec![0.0; labels.len()];
        self.store.for_each_linear(|label, bias| {
            if let Some(&i) = position.get(label) {
                linear_biases[i] = bias;
            }
        });
        let mut triplets = Vec::with_capacity(self.num_interactions());
        self.store.for_each_quadratic(|u, v, coupling| {
            if let (Some(&i), Some(&j)) = (position.get(u), position.get(v)) {
                triplets.push((i.min(j), i.max(j), coupling));
            }
        });
        triplets.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        SerializableBqm::new(labels.clone(), linear_biases, triplets, self.offset, self.vartype)
            .with_schema(S::SCHEMA_VERSION)
    }
}

impl<L, S> BinaryQuadraticModel<L, S>
where
    L: Label + Send + Sync,
    S: QuadraticStore<L> + Sync,
{
    /// Energies of many assignments, in input order
    pub fn energies(&self, samples: &[Sample<L>]) -> Result<Vec<f64>> {
        self.energies_with(samples, &BatchConfig::default())
    }

    pub fn energies_with(&self, samples: &[Sample<L>], config: &BatchConfig) -> Result<Vec<f64>> {
        batch_energies(samples, config, |sample| self.energy(sample))
    }
}

impl<L: Label> DenseBqm<L> {
    /// Upper-triangular interaction matrix with its row labels
    ///
    /// The last column holds the linear biases and the corner the offset.
    /// Passing both back to [`BinaryQuadraticModel::from_matrix`] with the
    /// same offset rebuilds an equal model.
    pub fn interaction_matrix(&self) -> Result<(Vec<L>, DenseMatrix)> {
        Ok((self.store.variables(), self.store.interaction_matrix()?))
    }
}

impl<L: Label, S: QuadraticStore<L>> Default for BinaryQuadraticModel<L, S> {
    fn default() -> Self {
        Self::new(Vartype::None)
    }
}

fn require_domain(vartype: Vartype) -> Result<()> {
    match vartype {
        Vartype::None => Err(BqmError::DomainMismatch),
        _ => Ok(()),
    }
}

fn ordered<L: Label>(u: &L, v: &L) -> (L, L) {
    if u <= v {
        (u.clone(), v.clone())
    } else {
        (v.clone(), u.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bqm_core::CooMatrix;

    fn scenario<S: QuadraticStore<i32>>() -> BinaryQuadraticModel<i32, S> {
        let mut bqm = BinaryQuadraticModel::new(Vartype::Spin);
        bqm.add_interaction(0, 1, 2.0).unwrap();
        bqm.add_interaction(1, 2, -1.0).unwrap();
        bqm.add_variable(0, 0.5).unwrap();
        bqm.add_offset(3.0);
        bqm
    }

    fn all_samples(labels: &[i32], vartype: Vartype) -> Vec<Sample<i32>> {
        let (low, high) = match vartype {
            Vartype::Spin => (-1, 1),
            _ => (0, 1),
        };
        (0..1u32 << labels.len())
            .map(|bits| {
                labels
                    .iter()
                    .enumerate()
                    .map(|(i, &l)| (l, if bits >> i & 1 == 1 { high } else { low }))
                    .collect()
            })
            .collect()
    }

    fn to_binary(sample: &Sample<i32>) -> Sample<i32> {
        sample.iter().map(|(&l, &s)| (l, (s + 1) / 2)).collect()
    }

    #[test]
    fn test_concrete_scenario() {
        let bqm = scenario::<SparseStore<i32>>();
        assert_eq!(bqm.linear(), [(0, 0.5)].into_iter().collect());
        assert_eq!(
            bqm.quadratic(),
            [((0, 1), 2.0), ((1, 2), -1.0)].into_iter().collect()
        );
        assert_eq!(bqm.offset(), 3.0);

        let binary = bqm.to_vartype(Vartype::Binary).unwrap();
        assert_eq!(binary.vartype(), Vartype::Binary);
        // Q = 4J, h = 2h - 2 sum J, offset += sum J - sum h
        assert_eq!(binary.get_quadratic(&0, &1), Ok(8.0));
        assert_eq!(binary.get_quadratic(&1, &2), Ok(-4.0));
        assert_eq!(binary.get_linear(&0), Ok(-3.0));
        assert_eq!(binary.get_linear(&1), Ok(-2.0));
        assert_eq!(binary.get_linear(&2), Ok(2.0));
        assert_eq!(binary.offset(), 3.5);

        for spin in all_samples(&[0, 1, 2], Vartype::Spin) {
            assert_eq!(bqm.energy(&spin), binary.energy(&to_binary(&spin)));
        }
    }

    #[test]
    fn test_dense_matches_sparse() {
        let sparse = scenario::<SparseStore<i32>>();
        let dense = scenario::<DenseStore<i32>>();
        assert_eq!(sparse.linear(), dense.linear());
        assert_eq!(sparse.quadratic(), dense.quadratic());
        assert_eq!(sparse.offset(), dense.offset());
        assert_eq!(dense.to_sparse().quadratic(), sparse.quadratic());
    }

    #[test]
    fn test_foreign_vartype_is_converted() {
        let mut bqm = SparseBqm::new(Vartype::Spin);
        bqm.add_interaction_with_vartype('a', 'b', 4.0, Vartype::Binary)
            .unwrap();
        // 4 x y = s t + s + t + 1
        assert_eq!(bqm.get_quadratic(&'a', &'b'), Ok(1.0));
        assert_eq!(bqm.get_linear(&'a'), Ok(1.0));
        assert_eq!(bqm.get_linear(&'b'), Ok(1.0));
        assert_eq!(bqm.offset(), 1.0);

        bqm.add_variable_with_vartype('c', 2.0, Vartype::Binary)
            .unwrap();
        assert_eq!(bqm.get_linear(&'c'), Ok(1.0));
        assert_eq!(bqm.offset(), 2.0);
    }

    #[test]
    fn test_untyped_model_adopts_first_tag() {
        let mut bqm = SparseBqm::<u8>::default();
        assert_eq!(bqm.add_variable(0, 1.0), Err(BqmError::DomainMismatch));
        bqm.add_variable_with_vartype(0, 1.0, Vartype::Binary)
            .unwrap();
        assert_eq!(bqm.vartype(), Vartype::Binary);
        bqm.add_variable(0, 1.0).unwrap();
        assert_eq!(bqm.get_linear(&0), Ok(2.0));
    }

    #[test]
    fn test_bulk_mismatch_leaves_model_unchanged() {
        let mut bqm = scenario::<DenseStore<i32>>();
        let before = (bqm.linear(), bqm.quadratic(), bqm.offset());
        let result = bqm.add_interactions_from_lists(
            vec![(3, 4), (4, 5), (5, 6)],
            vec![1.0, 2.0],
            Vartype::None,
        );
        assert_eq!(result, Err(BqmError::LengthMismatch));
        assert_eq!(before, (bqm.linear(), bqm.quadratic(), bqm.offset()));
        assert_eq!(bqm.num_variables(), 3);
    }

    #[test]
    fn test_remove_variables_from_is_all_or_nothing() {
        let mut bqm = scenario::<SparseStore<i32>>();
        assert_eq!(
            bqm.remove_variables_from([0, 9]),
            Err(BqmError::UnknownLabel)
        );
        assert_eq!(bqm.num_variables(), 3);
        bqm.remove_variables_from([0, 2]).unwrap();
        assert_eq!(bqm.variables(), vec![1]);
        assert_eq!(bqm.num_interactions(), 0);
    }

    #[test]
    fn test_fix_variable() {
        let mut bqm = scenario::<DenseStore<i32>>();
        let expected: Vec<f64> = all_samples(&[0, 2], Vartype::Spin)
            .iter()
            .map(|s| {
                let mut s = s.clone();
                s.insert(1, -1);
                bqm.energy(&s).unwrap()
            })
            .collect();

        bqm.fix_variable(&1, -1).unwrap();
        assert!(!bqm.contains(&1));
        let fixed: Vec<f64> = all_samples(&[0, 2], Vartype::Spin)
            .iter()
            .map(|s| bqm.energy(s).unwrap())
            .collect();
        assert_eq!(expected, fixed);
        assert_eq!(bqm.fix_variable(&0, 0), Err(BqmError::InvalidValue));
    }

    #[test]
    fn test_flip_variable_binary() {
        let mut bqm = scenario::<SparseStore<i32>>()
            .to_vartype(Vartype::Binary)
            .unwrap();
        let original = bqm.clone();
        bqm.flip_variable(&1).unwrap();
        for sample in all_samples(&[0, 1, 2], Vartype::Binary) {
            let mut flipped = sample.clone();
            flipped.insert(1, 1 - sample[&1]);
            assert_eq!(original.energy(&sample), bqm.energy(&flipped));
        }
    }

    #[test]
    fn test_scale_and_normalize() {
        let mut bqm = scenario::<SparseStore<i32>>();
        bqm.scale(2.0, &[0], &[], true).unwrap();
        assert_eq!(bqm.get_linear(&0), Ok(0.5));
        assert_eq!(bqm.get_quadratic(&0, &1), Ok(4.0));
        assert_eq!(bqm.offset(), 3.0);
        assert_eq!(bqm.scale(0.0, &[], &[], false), Err(BqmError::InvalidScalar));

        let factor = bqm.normalize((-1.0, 1.0), None, &[], &[], false).unwrap();
        assert_eq!(factor, 0.25);
        assert_eq!(bqm.max_quadratic(), Ok(1.0));
        assert_eq!(bqm.min_quadratic(), Ok(-0.5));
    }

    #[test]
    fn test_from_coo_matrix() {
        let coo = CooMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, 1.0), (0, 0, -1.0)]).unwrap();
        let bqm = DenseBqm::from_matrix(&coo, vec!["x", "y"], 0.5, Vartype::Binary, &LoadConfig::strict())
            .unwrap();
        assert_eq!(bqm.get_quadratic(&"x", &"y"), Ok(2.0));
        assert_eq!(bqm.get_linear(&"x"), Ok(-1.0));
        assert_eq!(bqm.offset(), 0.5);

        let (labels, matrix) = bqm.interaction_matrix().unwrap();
        assert_eq!(labels, vec!["x", "y"]);
        assert_eq!(matrix.get(0, 1), Some(2.0));
        assert_eq!(matrix.get(1, 0), Some(0.0));
        assert_eq!(matrix.get(0, 2), Some(-1.0));
        assert_eq!(matrix.get(2, 0), Some(0.0));
        assert_eq!(matrix.get(2, 2), Some(0.5));

        let back = SparseBqm::from_matrix(&matrix, labels, bqm.offset(), Vartype::Binary, &LoadConfig::default())
            .unwrap();
        assert_eq!(back.get_quadratic(&"x", &"y"), Ok(2.0));
        assert_eq!(back.get_linear(&"x"), Ok(-1.0));
    }

    #[test]
    fn test_serializable_schema_follows_backend() {
        let sparse = scenario::<SparseStore<i32>>();
        let dense = scenario::<DenseStore<i32>>();
        assert_eq!(sparse.to_serializable().version.bqm_schema, "3.0.0");

        let written = dense.to_serializable();
        assert_eq!(written.version.bqm_schema, "3.0.0-dense");
        assert!(written.is_dense());

        let back = SparseBqm::from_serializable(&written).unwrap();
        assert_eq!(back.linear(), dense.linear());
        assert_eq!(back.quadratic(), dense.quadratic());
        assert_eq!(back.offset(), dense.offset());
    }

    #[test]
    fn test_adjacency_and_degree() {
        let bqm = scenario::<DenseStore<i32>>();
        let adjacency = bqm.adjacency();
        assert_eq!(adjacency[&1].len(), 2);
        assert_eq!(adjacency[&0][&1], 2.0);
        assert_eq!(bqm.degree(&1), Ok(2));
        assert_eq!(bqm.degree(&7), Err(BqmError::UnknownLabel));
    }

    #[test]
    fn test_qubo_and_ising_exports() {
        let bqm = scenario::<SparseStore<i32>>();
        let (h, j, offset) = bqm.to_ising().unwrap();
        assert_eq!(h, bqm.linear());
        assert_eq!(j, bqm.quadratic());
        assert_eq!(offset, 3.0);

        let (qubo, offset) = bqm.to_qubo().unwrap();
        let back = SparseBqm::from_qubo(qubo, offset);
        for spin in all_samples(&[0, 1, 2], Vartype::Spin) {
            assert_eq!(bqm.energy(&spin), back.energy(&to_binary(&spin)));
        }
    }
}
