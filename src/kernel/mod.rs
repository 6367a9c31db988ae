//! Kernel functions for the dual perceptron

pub mod gaussian;
pub mod linear;
pub mod polynomial;
pub mod traits;

pub use self::gaussian::*;
pub use self::linear::*;
pub use self::polynomial::*;
pub use self::traits::*;

use crate::core::{PerceptronError, Result};
use serde::{Deserialize, Serialize};

/// Any of the built-in kernels, selectable at runtime and serializable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KernelFunction {
    Gaussian(GaussianKernel),
    Polynomial(PolynomialKernel),
    Linear,
}

impl KernelFunction {
    pub fn gaussian(sigma: f64) -> Result<Self> {
        GaussianKernel::new(sigma).map(Self::Gaussian)
    }

    pub fn polynomial(degree: f64) -> Result<Self> {
        PolynomialKernel::new(degree).map(Self::Polynomial)
    }

    pub fn linear() -> Self {
        Self::Linear
    }

    /// Re-check the hyperparameter of a kernel that bypassed the constructors
    pub fn validate(self) -> Result<Self> {
        match self {
            Self::Gaussian(k) => Self::gaussian(k.sigma()),
            Self::Polynomial(k) => Self::polynomial(k.degree()),
            Self::Linear => Ok(self),
        }
    }

    /// Build a kernel from its name and hyperparameter
    pub fn from_name(name: &str, hyperparameter: f64) -> Result<Self> {
        match name {
            "gaussian" | "rbf" => Self::gaussian(hyperparameter),
            "polynomial" | "poly" => Self::polynomial(hyperparameter),
            "linear" => Ok(Self::linear()),
            other => Err(PerceptronError::InvalidParameter(format!(
                "Unknown kernel: {other}"
            ))),
        }
    }

    fn inner(&self) -> &dyn Kernel {
        match self {
            Self::Gaussian(k) => k,
            Self::Polynomial(k) => k,
            Self::Linear => &LinearKernel,
        }
    }
}

impl Kernel for KernelFunction {
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        self.inner().evaluate(x, y)
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn hyperparameter(&self) -> Option<f64> {
        self.inner().hyperparameter()
    }
}

impl From<GaussianKernel> for KernelFunction {
    fn from(kernel: GaussianKernel) -> Self {
        Self::Gaussian(kernel)
    }
}

impl From<PolynomialKernel> for KernelFunction {
    fn from(kernel: PolynomialKernel) -> Self {
        Self::Polynomial(kernel)
    }
}

impl From<LinearKernel> for KernelFunction {
    fn from(_: LinearKernel) -> Self {
        Self::Linear
    }
}
