//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! k(x, y) = (<x, y> + 1)^k
//!
//! Common configurations:
//! - Affine kernel: k=1
//! - Quadratic kernel: k=2
//! - Cubic kernel: k=3

use crate::core::{PerceptronError, Result};
use crate::kernel::traits::Kernel;
use crate::utils::vector::dot;
use serde::{Deserialize, Serialize};

/// Polynomial kernel with a positive real degree
///
/// Integral degrees use exact integer powers, so a negative base is fine.
/// A fractional degree of a negative base has no real value; the kernel
/// then evaluates to 0.0 instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialKernel {
    degree: f64,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel of the given degree
    ///
    /// # Examples
    /// ```
    /// use rperceptron::kernel::{Kernel, PolynomialKernel};
    ///
    /// // (x·y + 1)²
    /// let kernel = PolynomialKernel::new(2.0).unwrap();
    /// assert_eq!(kernel.compute(&[1.0, 2.0], &[2.0, 1.0]).unwrap(), 25.0);
    /// ```
    pub fn new(degree: f64) -> Result<Self> {
        if !(degree.is_finite() && degree > 0.0) {
            return Err(PerceptronError::InvalidParameter(format!(
                "Polynomial degree must be positive, got: {degree}"
            )));
        }
        Ok(Self { degree })
    }

    /// Creates a quadratic kernel: (<x,y> + 1)²
    pub fn quadratic() -> Self {
        Self { degree: 2.0 }
    }

    /// Creates a cubic kernel: (<x,y> + 1)³
    pub fn cubic() -> Self {
        Self { degree: 3.0 }
    }

    pub fn degree(&self) -> f64 {
        self.degree
    }

    fn integral_degree(&self) -> Option<i32> {
        if self.degree.fract() == 0.0 && self.degree <= i32::MAX as f64 {
            Some(self.degree as i32)
        } else {
            None
        }
    }
}

impl Kernel for PolynomialKernel {
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        let base = dot(x, y) + 1.0;

        match self.integral_degree() {
            Some(degree) => base.powi(degree),
            // No real root; substitute zero
            None if base < 0.0 => 0.0,
            None => base.powf(self.degree),
        }
    }

    fn name(&self) -> &'static str {
        "polynomial"
    }

    fn hyperparameter(&self) -> Option<f64> {
        Some(self.degree)
    }
}
