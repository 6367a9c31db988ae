//! Binary linear perceptron
//!
//! Online mistake-driven training of a weight vector and bias on two-class
//! data. Training stops after the first epoch without mistakes, or after
//! `max_epochs` otherwise.
//!
//! The bias is not a gradient term: on every mistake it moves halfway
//! towards the signed mean feature value of the misclassified example,
//! `b = (b ± mean(x)) / 2`. This running estimate is part of the learned
//! decision boundary and is kept as is.
//!
//! Because of that rule the usual mistake bound only applies to data the
//! running bias can follow, such as classes separable through the origin.
//! Separable data whose boundary is offset from the origin can cycle
//! forever, in which case training ends at `max_epochs` unconverged.
//!
//! An example counts as a mistake when `y·(w·x + b) <= 0`, the same sign
//! test prediction uses, so a clean epoch means zero training errors.

use crate::core::{Classifier, Dataset, PerceptronError, Polarity, Prediction, Result};
use crate::utils::stats::polarity_counts;
use crate::utils::vector::{add_assign, dot, ensure_same_dim, mean, sub_assign};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Configuration for the binary perceptron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// Upper bound on epochs when the data is not separable
    pub max_epochs: usize,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self { max_epochs: 10 }
    }
}

/// Trainer for [`BinaryModel`]
#[derive(Debug, Clone, Default)]
pub struct BinaryPerceptron {
    config: BinaryConfig,
}

impl BinaryPerceptron {
    /// Create a trainer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BinaryConfig) -> Self {
        Self { config }
    }

    /// Set the epoch bound
    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.config.max_epochs = max_epochs;
        self
    }

    pub fn config(&self) -> &BinaryConfig {
        &self.config
    }

    /// Train on examples labeled `true` (positive) or `false` (negative)
    pub fn train(&self, dataset: &Dataset<bool>) -> Result<BinaryModel> {
        dataset.ensure_not_empty()?;
        if self.config.max_epochs == 0 {
            return Err(PerceptronError::InvalidParameter(
                "max_epochs must be at least 1".to_string(),
            ));
        }

        let (positive, negative) = polarity_counts(dataset);
        debug!(
            "Training binary perceptron on {} examples ({} positive, {} negative), dim {}",
            dataset.len(),
            positive,
            negative,
            dataset.dim()
        );

        let mut weights = vec![0.0; dataset.dim()];
        let mut bias = 0.0;
        let mut epochs_run = 0;
        let mut converged = false;

        while epochs_run < self.config.max_epochs {
            epochs_run += 1;
            let mut mistakes = 0;

            for example in dataset {
                let x = &example.features;
                let polarity = Polarity::from(example.label);
                let activation = dot(&weights, x) + bias;

                // The label scales the bias too
                if polarity.signum() * activation <= 0.0 {
                    mistakes += 1;
                    match polarity {
                        Polarity::Positive => add_assign(&mut weights, x),
                        Polarity::Negative => sub_assign(&mut weights, x),
                    }
                    bias = (bias + polarity.signum() * mean(x)) / 2.0;
                }
            }

            debug!("Epoch {epochs_run}: {mistakes} mistakes");
            if mistakes == 0 {
                converged = true;
                break;
            }
        }

        if converged {
            info!("Binary perceptron converged after {epochs_run} epochs");
        } else {
            warn!(
                "Binary perceptron did not converge within {} epochs",
                self.config.max_epochs
            );
        }

        Ok(BinaryModel {
            weights,
            bias,
            epochs_run,
            converged,
        })
    }
}

/// Trained binary perceptron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryModel {
    weights: Vec<f64>,
    bias: f64,
    epochs_run: usize,
    converged: bool,
}

impl BinaryModel {
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Number of epochs the training loop ran
    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Whether the last epoch made no mistakes
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// w·x + b
    pub fn activation(&self, features: &[f64]) -> Result<f64> {
        ensure_same_dim(self.weights.len(), features.len())?;
        Ok(dot(&self.weights, features) + self.bias)
    }
}

impl Classifier for BinaryModel {
    type Label = bool;

    fn dim(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction<bool>> {
        let activation = self.activation(features)?;
        Ok(Prediction::new(
            Polarity::of(activation).is_positive(),
            activation,
        ))
    }
}
