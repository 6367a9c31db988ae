//! Linear kernel implementation

use crate::kernel::Kernel;
use crate::utils::vector::dot;
use serde::{Deserialize, Serialize};

/// Linear kernel: k(x, y) = x^T * y
///
/// With this kernel the dual perceptron learns the same decision function as
/// a bias-free linear perceptron.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearKernel;

impl LinearKernel {
    /// Create a new linear kernel
    pub fn new() -> Self {
        Self
    }
}

impl Kernel for LinearKernel {
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        dot(x, y)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
