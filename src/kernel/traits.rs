//! Kernel trait definition

use crate::core::Result;
use crate::utils::vector::ensure_same_dim;

/// Kernel function trait
///
/// A kernel k(x, y) is a symmetric similarity between two vectors of equal
/// dimension, parameterised by at most one scalar hyperparameter held by the
/// implementing type.
pub trait Kernel: Send + Sync {
    /// Compute k(x, y) on vectors whose lengths are already known to agree
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64;

    /// Short name used in logs and saved models
    fn name(&self) -> &'static str;

    /// The scalar hyperparameter, if the kernel has one
    fn hyperparameter(&self) -> Option<f64> {
        None
    }

    /// Compute k(x, y), failing with `DimensionMismatch` on unequal lengths
    fn compute(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        ensure_same_dim(x.len(), y.len())?;
        Ok(self.evaluate(x, y))
    }
}

impl<K: Kernel + ?Sized> Kernel for &K {
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        (**self).evaluate(x, y)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn hyperparameter(&self) -> Option<f64> {
        (**self).hyperparameter()
    }
}
