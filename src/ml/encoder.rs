// ============================================================
// Layer 5 - One-Hot Encoder
// ============================================================
// Fitting records every distinct value in first-appearance order.
// Transforming maps a value to an indicator vector with a single
// 1.0 at the value's position:
//
//   vocabulary [CSH, CRD, NOC],  "CRD" → [0, 1, 0]
//
// Values never seen during fitting map to an all-zero vector
// instead of failing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::frame::Column;

/// Unfitted one-hot encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneHotEncoder;

impl OneHotEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Learn the vocabulary of `values`.
    pub fn fit(&self, values: &[String]) -> FittedOneHotEncoder {
        let mut vocabulary: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for v in values {
            if !index.contains_key(v) {
                index.insert(v.clone(), vocabulary.len());
                vocabulary.push(v.clone());
            }
        }

        FittedOneHotEncoder { vocabulary, index }
    }
}

/// Serializable parameters for a fitted encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Categories in indicator order
    pub vocabulary: Vec<String>,
}

/// Fitted encoder with a frozen vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedOneHotEncoder {
    vocabulary: Vec<String>,
    index:      HashMap<String, usize>,
}

impl FittedOneHotEncoder {
    /// Categories learned during fitting, in indicator order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Width of every encoded vector.
    pub fn n_features_out(&self) -> usize {
        self.vocabulary.len()
    }

    /// Position of `value`'s indicator, or `None` if unseen.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn transform(&self, values: &[String]) -> Column {
        let width = self.n_features_out();
        let mut out = vec![0.0f64; values.len() * width];

        for (row, v) in values.iter().enumerate() {
            if let Some(pos) = self.position(v) {
                out[row * width + pos] = 1.0;
            }
        }

        Column::Vector { width, values: out }
    }

    pub fn extract_params(&self) -> OneHotEncoderParams {
        OneHotEncoderParams { vocabulary: self.vocabulary.clone() }
    }

    pub fn from_params(params: OneHotEncoderParams) -> Self {
        let index = params
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();
        Self { vocabulary: params.vocabulary, index }
    }
}
