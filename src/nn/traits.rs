//! Neural network traits for move prediction.
//!
//! These traits define the interface between the Rust game engine and
//! neural network implementations (typically in Python via PyO3).

use serde::{Deserialize, Serialize};

use crate::core::GameError;

/// Encoded game state as a flat tensor for neural network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor (e.g., [points, dimension] or [features]).
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

    /// Create a tensor of the given shape filled with `value`.
    pub fn filled(shape: Vec<usize>, value: f32) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![value; size],
            shape,
        }
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

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }

    /// Set element at a flat index.
    pub fn set(&mut self, index: usize, value: f32) {
        if index < self.tensor.len() {
            self.tensor[index] = value;
        }
    }
}

/// Policy network outputs action scores.
///
/// Given an encoded state, returns one score per action. Players pick the
/// best-scoring legal action, so the scores need not be normalised.
pub trait PolicyNetwork: Send + Sync {
    /// Predict action scores for the given state.
    fn predict(&self, encoded: &EncodedState) -> Result<Vec<f32>, GameError>;

    /// Batch prediction for multiple states (optional optimization).
    fn predict_batch(&self, encoded: &[EncodedState]) -> Result<Vec<Vec<f32>>, GameError> {
        encoded.iter().map(|e| self.predict(e)).collect()
    }
}

/// Uniform policy (baseline for testing).
#[derive(Clone, Debug, Default)]
pub struct UniformPolicy {
    action_space_size: usize,
}

impl UniformPolicy {
    /// Create a new uniform policy.
    pub fn new(action_space_size: usize) -> Self {
        Self { action_space_size }
    }
}

impl PolicyNetwork for UniformPolicy {
    fn predict(&self, _encoded: &EncodedState) -> Result<Vec<f32>, GameError> {
        if self.action_space_size == 0 {
            return Ok(vec![]);
        }
        let prob = 1.0 / self.action_space_size as f32;
        Ok(vec![prob; self.action_space_size])
    }
}
