//! Serializable mirrors of the model types
//!
//! These structures carry everything needed to rebuild an equivalent model:
//! labels, biases in label order, couplings as index lists into the labels,
//! offset and vartype. Encoding (JSON or otherwise) is left to the caller.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::constants::{
    BIAS_TYPE, BPM_SCHEMA_VERSION, BPM_TYPE, BQM_DENSE_SCHEMA_VERSION, BQM_SCHEMA_VERSION, BQM_TYPE,
    UINT16_INDEX_LIMIT,
};
use crate::{BqmError, Result, Vartype};

/// Schema version block of a serialized quadratic model
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BqmSchemaVersion {
    pub bqm_schema: String,
}

/// Schema version block of a serialized polynomial model
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmSchemaVersion {
    pub bpm_schema: String,
}

/// Serializable form of a binary quadratic model
///
/// `linear_biases[i]` belongs to `variable_labels[i]`; coupling `k` joins
/// `variable_labels[quadratic_head[k]]` and
/// `variable_labels[quadratic_tail[k]]` with `quadratic_biases[k]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializableBqm<L> {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_tag: String,
    pub version: BqmSchemaVersion,
    pub use_bytes: bool,
    pub index_type: String,
    pub bias_type: String,
    pub num_variables: usize,
    pub num_interactions: usize,
    pub variable_labels: Vec<L>,
    pub variable_type: Vartype,
    pub offset: f64,
    pub linear_biases: Vec<f64>,
    pub quadratic_biases: Vec<f64>,
    pub quadratic_head: Vec<usize>,
    pub quadratic_tail: Vec<usize>,
}

impl<L> SerializableBqm<L> {
    /// Assemble a serializable model, filling in the bookkeeping fields
    pub fn new(
        variable_labels: Vec<L>,
        linear_biases: Vec<f64>,
        quadratic: Vec<(usize, usize, f64)>,
        offset: f64,
        variable_type: Vartype,
    ) -> Self {
        let num_variables = variable_labels.len();
        let num_interactions = quadratic.len();
        let mut quadratic_head = Vec::with_capacity(num_interactions);
        let mut quadratic_tail = Vec::with_capacity(num_interactions);
        let mut quadratic_biases = Vec::with_capacity(num_interactions);
        for (head, tail, bias) in quadratic {
            quadratic_head.push(head);
            quadratic_tail.push(tail);
            quadratic_biases.push(bias);
        }
        Self {
            type_tag: BQM_TYPE.to_string(),
            version: BqmSchemaVersion {
                bqm_schema: BQM_SCHEMA_VERSION.to_string(),
            },
            use_bytes: false,
            index_type: index_type_for(num_variables).to_string(),
            bias_type: BIAS_TYPE.to_string(),
            num_variables,
            num_interactions,
            variable_labels,
            variable_type,
            offset,
            linear_biases,
            quadratic_biases,
            quadratic_head,
            quadratic_tail,
        }
    }

    /// Replace the recorded schema version
    pub fn with_schema(mut self, schema: &str) -> Self {
        self.version.bqm_schema = schema.to_string();
        self
    }

    /// Whether the document was written from dense storage
    pub fn is_dense(&self) -> bool {
        self.version.bqm_schema == BQM_DENSE_SCHEMA_VERSION
    }

    /// Check tags, schema version and list consistency
    pub fn validate(&self) -> Result<()> {
        if self.type_tag != BQM_TYPE || !same_major(&self.version.bqm_schema, BQM_SCHEMA_VERSION) {
            return Err(BqmError::InvalidSchema);
        }
        if self.variable_type == Vartype::None {
            return Err(BqmError::InvalidSchema);
        }
        let n = self.variable_labels.len();
        if self.linear_biases.len() != n
            || self.quadratic_head.len() != self.quadratic_biases.len()
            || self.quadratic_tail.len() != self.quadratic_biases.len()
        {
            return Err(BqmError::LengthMismatch);
        }
        let in_range = |idx: &usize| *idx < n;
        if !self.quadratic_head.iter().all(in_range) || !self.quadratic_tail.iter().all(in_range) {
            return Err(BqmError::InvalidSchema);
        }
        Ok(())
    }

    /// Iterate couplings as `(head, tail, bias)` index triplets
    pub fn quadratic_triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.quadratic_head
            .iter()
            .zip(&self.quadratic_tail)
            .zip(&self.quadratic_biases)
            .map(|((&h, &t), &b)| (h, t, b))
    }
}

/// Serializable form of a binary polynomial model
///
/// Each key is stored as indices into `variable_labels`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerializablePolynomial<L> {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_tag: String,
    pub version: BpmSchemaVersion,
    pub variable_labels: Vec<L>,
    pub variable_type: Vartype,
    pub offset: f64,
    pub poly_key_distance_list: Vec<Vec<usize>>,
    pub poly_value_list: Vec<f64>,
}

impl<L> SerializablePolynomial<L> {
    pub fn new(
        variable_labels: Vec<L>,
        poly_key_distance_list: Vec<Vec<usize>>,
        poly_value_list: Vec<f64>,
        offset: f64,
        variable_type: Vartype,
    ) -> Self {
        Self {
            type_tag: BPM_TYPE.to_string(),
            version: BpmSchemaVersion {
                bpm_schema: BPM_SCHEMA_VERSION.to_string(),
            },
            variable_labels,
            variable_type,
            offset,
            poly_key_distance_list,
            poly_value_list,
        }
    }

    /// Check tags, schema version and list consistency
    pub fn validate(&self) -> Result<()> {
        if self.type_tag != BPM_TYPE || !same_major(&self.version.bpm_schema, BPM_SCHEMA_VERSION) {
            return Err(BqmError::InvalidSchema);
        }
        if self.variable_type == Vartype::None {
            return Err(BqmError::InvalidSchema);
        }
        if self.poly_key_distance_list.len() != self.poly_value_list.len() {
            return Err(BqmError::LengthMismatch);
        }
        let n = self.variable_labels.len();
        if self
            .poly_key_distance_list
            .iter()
            .flatten()
            .any(|&idx| idx >= n)
        {
            return Err(BqmError::InvalidSchema);
        }
        Ok(())
    }
}

/// Index type name recorded for a model with `num_variables` labels
pub fn index_type_for(num_variables: usize) -> &'static str {
    if num_variables <= UINT16_INDEX_LIMIT {
        "uint16"
    } else {
        "uint32"
    }
}

fn same_major(found: &str, expected: &str) -> bool {
    fn major(v: &str) -> &str {
        v.split('.').next().map(|m| m.trim()).unwrap_or("")
    }
    !found.is_empty() && major(found) == major(expected)
}
