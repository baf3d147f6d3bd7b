//! JSON rendering of the serializable model forms

use bqm_core::{BqmError, Label, QuadraticStore, SerializableBqm, SerializablePolynomial};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::model::BinaryQuadraticModel;
use crate::polynomial::BinaryPolynomialModel;

/// Failure while encoding or decoding a model document
#[derive(Debug, Error)]
pub enum InterchangeError {
    /// Document decoded but does not describe a valid model
    #[error("model error: {0}")]
    Model(#[from] BqmError),

    /// Document is not valid JSON for the expected structure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<L: Label + Serialize, S: QuadraticStore<L>> BinaryQuadraticModel<L, S> {
    /// Encode [`Self::to_serializable`] as JSON
    pub fn to_json(&self) -> Result<String, InterchangeError> {
        Ok(serde_json::to_string(&self.to_serializable())?)
    }
}

impl<L: Label + DeserializeOwned, S: QuadraticStore<L>> BinaryQuadraticModel<L, S> {
    /// Decode a model written by [`Self::to_json`]
    pub fn from_json(json: &str) -> Result<Self, InterchangeError> {
        let serializable: SerializableBqm<L> = serde_json::from_str(json)?;
        Ok(Self::from_serializable(&serializable)?)
    }
}

impl<L: Label + Serialize> BinaryPolynomialModel<L> {
    /// Encode [`Self::to_serializable`] as JSON
    pub fn to_json(&self) -> Result<String, InterchangeError> {
        Ok(serde_json::to_string(&self.to_serializable())?)
    }
}

impl<L: Label + DeserializeOwned> BinaryPolynomialModel<L> {
    /// Decode a model written by [`Self::to_json`]
    pub fn from_json(json: &str) -> Result<Self, InterchangeError> {
        let serializable: SerializablePolynomial<L> = serde_json::from_str(json)?;
        Ok(Self::from_serializable(&serializable)?)
    }
}
