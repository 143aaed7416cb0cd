//! Flat observation tensor.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Encoded game state as a flat tensor for agent input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor. Observations here are always `[features]`.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// Check if the tensor is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// A block of features, e.g. one [`super::ObservationLayout`] range.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &[f32] {
        self.tensor.get(range).unwrap_or(&[])
    }
}
