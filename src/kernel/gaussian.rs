//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: k(x, y) = exp(-||x - y||² / σ²)
//! where σ (sigma) is the bandwidth.

use crate::core::{PerceptronError, Result};
use crate::kernel::Kernel;
use crate::utils::vector::squared_distance;
use serde::{Deserialize, Serialize};

/// Gaussian kernel: k(x, y) = exp(-||x - y||² / σ²)
///
/// The bandwidth controls the "reach" of each training example:
/// - Small sigma: only very close points are similar (potential overfitting)
/// - Large sigma: distant points still influence each other (potential underfitting)
///
/// Values lie in [0, 1] and k(x, x) = 1 for every valid bandwidth. Very
/// distant points (or a tiny sigma) underflow to exactly 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianKernel {
    sigma: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with the given bandwidth
    ///
    /// # Errors
    /// `InvalidParameter` if sigma is not a finite positive number
    pub fn new(sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(PerceptronError::InvalidParameter(format!(
                "Gaussian bandwidth must be positive, got: {sigma}"
            )));
        }
        Ok(Self { sigma })
    }

    /// Create a Gaussian kernel with σ² = n_features
    ///
    /// Scales the squared distance by the dimensionality, a common default.
    pub fn with_auto_sigma(n_features: usize) -> Result<Self> {
        Self::new((n_features as f64).sqrt())
    }

    /// Get the sigma parameter
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for GaussianKernel {
    /// Unit bandwidth
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl Kernel for GaussianKernel {
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        // Divide twice: sigma² alone underflows to 0 for tiny sigma
        let squared_distance = squared_distance(x, y);
        (-(squared_distance / self.sigma) / self.sigma).exp()
    }

    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn hyperparameter(&self) -> Option<f64> {
        Some(self.sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_creation() {
        let kernel = GaussianKernel::new(0.5).unwrap();
        assert_eq!(kernel.sigma(), 0.5);

        let kernel_auto = GaussianKernel::with_auto_sigma(4).unwrap();
        assert_eq!(kernel_auto.sigma(), 2.0);

        assert_eq!(GaussianKernel::default().sigma(), 1.0);
    }

    #[test]
    fn test_gaussian_kernel_invalid_sigma() {
        assert!(GaussianKernel::new(-0.5).is_err());
        assert!(GaussianKernel::new(0.0).is_err());
        assert!(GaussianKernel::new(f64::NAN).is_err());
        assert!(GaussianKernel::with_auto_sigma(0).is_err());
    }

    #[test]
    fn test_gaussian_kernel_identical_vectors() {
        for sigma in [0.1, 1.0, 7.5] {
            let kernel = GaussianKernel::new(sigma).unwrap();
            let x = [1.0, 2.0, 3.0];
            assert_eq!(kernel.compute(&x, &x).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_gaussian_kernel_tiny_sigma() {
        let kernel = GaussianKernel::new(1e-200).unwrap();
        let x = [1.0, 2.0];

        assert_eq!(kernel.compute(&x, &x).unwrap(), 1.0);
        let far = kernel.compute(&x, &[1.0, 2.5]).unwrap();
        assert!(!far.is_nan());
        assert_eq!(far, 0.0);
    }

    #[test]
    fn test_gaussian_kernel_value() {
        let kernel = GaussianKernel::new(2.0).unwrap();
        let x = [1.0, 0.0];
        let y = [0.0, 1.0];

        // ||x - y||² = 2, σ² = 4
        let expected = (-0.5_f64).exp();
        assert_relative_eq!(kernel.compute(&x, &y).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_kernel_symmetry() {
        let kernel = GaussianKernel::new(0.7).unwrap();
        let x = [0.3, -1.2, 4.0];
        let y = [2.0, 0.5, -0.25];
        assert_eq!(
            kernel.compute(&x, &y).unwrap(),
            kernel.compute(&y, &x).unwrap()
        );
    }

    #[test]
    fn test_gaussian_kernel_decreases_with_distance() {
        let kernel = GaussianKernel::new(1.0).unwrap();
        let x = [0.0];
        let k1 = kernel.compute(&x, &[1.0]).unwrap();
        let k2 = kernel.compute(&x, &[2.0]).unwrap();
        let k3 = kernel.compute(&x, &[3.0]).unwrap();

        assert!(k1 > k2);
        assert!(k2 > k3);
        assert!(k3 > 0.0);
    }

    #[test]
    fn test_gaussian_kernel_dimension_mismatch() {
        let kernel = GaussianKernel::default();
        let result = kernel.compute(&[1.0, 2.0], &[1.0]);
        assert!(matches!(
            result,
            Err(PerceptronError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}
