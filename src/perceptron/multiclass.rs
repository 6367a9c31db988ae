//! Multi-class perceptron (Kesler construction)
//!
//! One weight row per class; the predicted class is the row with the highest
//! score `W_i · x`, ties going to the lowest class index. On a mistake the
//! example is added to the true class's row and then subtracted from the
//! predicted class's row.
//!
//! Unlike the binary perceptron this trainer always runs the configured
//! number of epochs; it does not stop early on convergence.

use crate::core::{Classifier, ClassIndex, Dataset, PerceptronError, Prediction, Result};
use crate::utils::vector::{add_assign, dot, ensure_same_dim, sub_assign};
use log::{debug, info};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::hash::Hash;

/// Configuration for the multi-class perceptron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassConfig {
    /// Number of passes over the training set
    pub epochs: usize,
    /// Append a constant 1.0 feature so each class row carries an offset
    pub fit_bias: bool,
}

impl Default for MulticlassConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            fit_bias: false,
        }
    }
}

/// Trainer for [`MulticlassModel`]
#[derive(Debug, Clone)]
pub struct MulticlassPerceptron {
    n_classes: usize,
    config: MulticlassConfig,
}

impl MulticlassPerceptron {
    /// Create a trainer expecting exactly `n_classes` distinct labels
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            config: MulticlassConfig::default(),
        }
    }

    pub fn with_config(n_classes: usize, config: MulticlassConfig) -> Self {
        Self { n_classes, config }
    }

    /// Set the number of epochs
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    /// Enable or disable the per-class offset column
    pub fn with_bias(mut self, fit_bias: bool) -> Self {
        self.config.fit_bias = fit_bias;
        self
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn config(&self) -> &MulticlassConfig {
        &self.config
    }

    /// Discover the classes of `dataset` and train on it
    ///
    /// Fails with `InvalidClassCount` unless the dataset holds exactly the
    /// declared number of distinct labels.
    pub fn train<L>(&self, dataset: &Dataset<L>) -> Result<MulticlassModel<L>>
    where
        L: Clone + Eq + Hash,
    {
        let classes = ClassIndex::build(dataset, self.n_classes)?;
        self.train_with_index(dataset, classes)
    }

    /// Train with a class index built elsewhere, e.g. on the full dataset
    /// before a train/test split
    pub fn train_with_index<L>(
        &self,
        dataset: &Dataset<L>,
        classes: ClassIndex<L>,
    ) -> Result<MulticlassModel<L>>
    where
        L: Clone + Eq + Hash,
    {
        dataset.ensure_not_empty()?;
        if self.config.epochs == 0 {
            return Err(PerceptronError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            ));
        }
        if classes.len() != self.n_classes {
            return Err(PerceptronError::class_count(self.n_classes, classes.len()));
        }

        // Resolve every label before touching the weights
        let targets = dataset
            .iter()
            .enumerate()
            .map(|(position, example)| {
                classes
                    .index_of(&example.label)
                    .ok_or(PerceptronError::UnknownLabel { position })
            })
            .collect::<Result<Vec<usize>>>()?;

        debug!(
            "Training multi-class perceptron: {} examples, {} classes, dim {}, bias {}",
            dataset.len(),
            classes.len(),
            dataset.dim(),
            self.config.fit_bias
        );

        let mut weights = WeightMatrix::zeros(classes.len(), dataset.dim(), self.config.fit_bias);
        let mut mistakes_per_epoch = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            let mut mistakes = 0;

            for (example, &target) in dataset.iter().zip(&targets) {
                let (predicted, _) = weights.argmax(&example.features);
                if predicted != target {
                    mistakes += 1;
                    weights.add_to_row(target, &example.features);
                    weights.sub_from_row(predicted, &example.features);
                }
            }

            debug!("Epoch {epoch}: {mistakes} mistakes");
            mistakes_per_epoch.push(mistakes);
        }

        info!(
            "Multi-class perceptron trained for {} epochs, {} mistakes in the last one",
            self.config.epochs,
            mistakes_per_epoch.last().copied().unwrap_or(0)
        );

        Ok(MulticlassModel {
            weights,
            classes,
            mistakes_per_epoch,
        })
    }
}

/// Row-major `m × (d [+1])` matrix of class weights
///
/// When the bias column is present it is the last column and multiplies an
/// implicit constant feature of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightMatrix {
    rows: usize,
    dim: usize,
    bias: bool,
    data: Vec<f64>,
}

/// Field layout of a saved matrix, checked before use
#[derive(Deserialize)]
struct RawWeightMatrix {
    rows: usize,
    dim: usize,
    bias: bool,
    data: Vec<f64>,
}

impl<'de> Deserialize<'de> for WeightMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawWeightMatrix::deserialize(deserializer)?;
        let cols = raw.dim + usize::from(raw.bias);
        match raw.rows.checked_mul(cols) {
            Some(len) if len == raw.data.len() => Ok(Self {
                rows: raw.rows,
                dim: raw.dim,
                bias: raw.bias,
                data: raw.data,
            }),
            _ => Err(D::Error::custom(format!(
                "weight matrix of {} rows by {cols} columns cannot hold {} values",
                raw.rows,
                raw.data.len()
            ))),
        }
    }
}

impl WeightMatrix {
    fn zeros(rows: usize, dim: usize, bias: bool) -> Self {
        let cols = dim + usize::from(bias);
        Self {
            rows,
            dim,
            bias,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of class rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, including the bias column
    pub fn cols(&self) -> usize {
        self.dim + usize::from(self.bias)
    }

    /// Feature dimension the rows apply to
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn has_bias(&self) -> bool {
        self.bias
    }

    /// Full row, bias column included
    pub fn row(&self, i: usize) -> &[f64] {
        let cols = self.cols();
        &self.data[i * cols..(i + 1) * cols]
    }

    fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let cols = self.cols();
        &mut self.data[i * cols..(i + 1) * cols]
    }

    /// Score of class `i`: W_i · x (+ offset)
    pub fn score(&self, i: usize, x: &[f64]) -> f64 {
        let row = self.row(i);
        let score = dot(&row[..self.dim], x);
        if self.bias {
            score + row[self.dim]
        } else {
            score
        }
    }

    /// Highest-scoring class and its score, lowest index on ties
    fn argmax(&self, x: &[f64]) -> (usize, f64) {
        let mut best = (0, self.score(0, x));
        for i in 1..self.rows {
            let score = self.score(i, x);
            if score > best.1 {
                best = (i, score);
            }
        }
        best
    }

    fn add_to_row(&mut self, i: usize, x: &[f64]) {
        let (dim, bias) = (self.dim, self.bias);
        let row = self.row_mut(i);
        add_assign(&mut row[..dim], x);
        if bias {
            row[dim] += 1.0;
        }
    }

    fn sub_from_row(&mut self, i: usize, x: &[f64]) {
        let (dim, bias) = (self.dim, self.bias);
        let row = self.row_mut(i);
        sub_assign(&mut row[..dim], x);
        if bias {
            row[dim] -= 1.0;
        }
    }
}

/// Trained multi-class perceptron
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize",
    deserialize = "L: Deserialize<'de> + Clone + Eq + Hash"
))]
pub struct MulticlassModel<L> {
    weights: WeightMatrix,
    classes: ClassIndex<L>,
    mistakes_per_epoch: Vec<usize>,
}

impl<L> MulticlassModel<L> {
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    pub fn classes(&self) -> &ClassIndex<L> {
        &self.classes
    }

    /// Mistakes made during each training epoch
    pub fn mistakes_per_epoch(&self) -> &[usize] {
        &self.mistakes_per_epoch
    }

    /// Score of every class for `features`, in class-index order
    pub fn scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        ensure_same_dim(self.weights.dim(), features.len())?;
        Ok((0..self.weights.rows())
            .map(|i| self.weights.score(i, features))
            .collect())
    }
}

impl<L: Clone + PartialEq> Classifier for MulticlassModel<L> {
    type Label = L;

    fn dim(&self) -> usize {
        self.weights.dim()
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction<L>> {
        ensure_same_dim(self.weights.dim(), features.len())?;
        if self.weights.rows() == 0 || self.classes.len() != self.weights.rows() {
            return Err(PerceptronError::InvalidParameter(
                "model class index does not match its weight rows".to_string(),
            ));
        }
        let (best, score) = self.weights.argmax(features);
        Ok(Prediction::new(self.classes.labels()[best].clone(), score))
    }
}
