//! Perceptron trainers and the models they produce
//!
//! - [`binary`]: linear perceptron on `bool` labels, stops on convergence
//! - [`multiclass`]: one weight row per class, fixed number of epochs
//! - [`dual`]: kernel perceptron on `bool` labels, model borrows its training set

pub mod binary;
pub mod dual;
pub mod multiclass;

pub use self::binary::{BinaryConfig, BinaryModel, BinaryPerceptron};
pub use self::dual::{KernelConfig, KernelModel, KernelPerceptron};
pub use self::multiclass::{MulticlassConfig, MulticlassModel, MulticlassPerceptron, WeightMatrix};
