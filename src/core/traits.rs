//! Core traits for perceptron models

use crate::core::{Example, Prediction, Result};

/// Trained model able to label feature vectors
///
/// Implemented by every model the trainers produce, so that the evaluator
/// can score them uniformly.
pub trait Classifier {
    /// Label type produced by the model
    type Label: Clone + PartialEq;

    /// Feature dimension the model expects
    fn dim(&self) -> usize;

    /// Predict a single feature vector
    ///
    /// Fails with `DimensionMismatch` when `features.len() != self.dim()`.
    fn predict(&self, features: &[f64]) -> Result<Prediction<Self::Label>>;

    /// Predict multiple examples, stopping at the first error
    fn predict_batch(&self, examples: &[Example<Self::Label>]) -> Result<Vec<Prediction<Self::Label>>> {
        examples.iter().map(|e| self.predict(&e.features)).collect()
    }
}
