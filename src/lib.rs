//! Rust implementation of the perceptron family
//!
//! - Binary linear perceptron with a running-mean bias
//! - Multi-class perceptron (Kesler construction, one weight row per class)
//! - Kernel perceptron in dual form with Gaussian, polynomial and linear kernels
//!
//! Models implement [`Classifier`] and can be scored with [`Evaluator`].

pub mod cache;
pub mod core;
pub mod data;
pub mod eval;
pub mod kernel;
pub mod perceptron;
pub mod persistence;
pub mod utils;

// Re-export main types for convenience
pub use crate::cache::{CacheStats, GramCache};
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::CsvDataset;
pub use crate::eval::{Evaluator, Misclassification, Score};
pub use crate::kernel::{GaussianKernel, Kernel, KernelFunction, LinearKernel, PolynomialKernel};
pub use crate::perceptron::{
    BinaryConfig, BinaryModel, BinaryPerceptron, KernelConfig, KernelModel, KernelPerceptron,
    MulticlassConfig, MulticlassModel, MulticlassPerceptron,
};
pub use crate::persistence::{LoadedModel, SavedModel, SerializableModel};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
