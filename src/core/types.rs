//! Core type definitions shared by every trainer

use crate::core::{PerceptronError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::hash::Hash;

/// Prediction result containing label and decision value
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction<L> {
    /// Predicted class label
    pub label: L,
    /// Raw decision function value behind the label
    pub decision_value: f64,
}

impl<L> Prediction<L> {
    /// Create a new prediction
    pub fn new(label: L, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// One of the two polarities of a binary classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Polarity of an activation. Zero belongs to the negative side.
    pub fn of(activation: f64) -> Self {
        if activation > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// +1.0 or -1.0
    pub fn signum(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }
}

impl From<bool> for Polarity {
    fn from(positive: bool) -> Self {
        if positive {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Labeled example: a dense feature vector and a class label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example<L> {
    pub features: Vec<f64>,
    pub label: L,
}

impl<L> Example<L> {
    /// Create a new example
    pub fn new(features: Vec<f64>, label: L) -> Self {
        Self { features, label }
    }

    /// Number of features
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// In-memory set of examples that all share one dimension
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<L> {
    examples: Vec<Example<L>>,
    dim: usize,
}

impl<L> Dataset<L> {
    /// Create a dataset, checking every example against the first one's dimension
    pub fn new(examples: Vec<Example<L>>) -> Result<Self> {
        let dim = examples.first().map(Example::dim).unwrap_or(0);
        if let Some(bad) = examples.iter().find(|e| e.dim() != dim) {
            return Err(PerceptronError::DimensionMismatch {
                expected: dim,
                actual: bad.dim(),
            });
        }
        Ok(Self { examples, dim })
    }

    /// Build a dataset from `(features, label)` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<f64>, L)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(features, label)| Example::new(features, label))
                .collect(),
        )
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Shared feature dimension (0 for an empty dataset)
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn examples(&self) -> &[Example<L>] {
        &self.examples
    }

    pub fn get(&self, i: usize) -> Option<&Example<L>> {
        self.examples.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example<L>> {
        self.examples.iter()
    }

    /// Fails with `EmptyDataset` when there is nothing to learn from
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(PerceptronError::EmptyDataset)
        } else {
            Ok(())
        }
    }

    /// Convert labels, keeping features and order
    pub fn map_labels<M, F>(&self, mut f: F) -> Dataset<M>
    where
        F: FnMut(&L) -> M,
    {
        Dataset {
            examples: self
                .examples
                .iter()
                .map(|e| Example::new(e.features.clone(), f(&e.label)))
                .collect(),
            dim: self.dim,
        }
    }

    pub fn into_examples(self) -> Vec<Example<L>> {
        self.examples
    }
}

impl<'a, L> IntoIterator for &'a Dataset<L> {
    type Item = &'a Example<L>;
    type IntoIter = std::slice::Iter<'a, Example<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

impl<L: Serialize> Serialize for Dataset<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.examples.serialize(serializer)
    }
}

impl<'de, L: Deserialize<'de>> Deserialize<'de> for Dataset<L> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let examples = Vec::<Example<L>>::deserialize(deserializer)?;
        Dataset::new(examples).map_err(D::Error::custom)
    }
}

/// Bijection between the distinct labels of a training set and `0..m`
///
/// Indices follow first-seen order, so class 0 is the label of the first
/// example.
#[derive(Debug, Clone)]
pub struct ClassIndex<L> {
    labels: Vec<L>,
    positions: HashMap<L, usize>,
}

impl<L: Clone + Eq + Hash> ClassIndex<L> {
    /// Scan `dataset` and require exactly `declared` distinct labels
    pub fn build(dataset: &Dataset<L>, declared: usize) -> Result<Self> {
        dataset.ensure_not_empty()?;

        let mut index = Self {
            labels: Vec::new(),
            positions: HashMap::new(),
        };
        for example in dataset {
            if !index.positions.contains_key(&example.label) {
                index
                    .positions
                    .insert(example.label.clone(), index.labels.len());
                index.labels.push(example.label.clone());
            }
        }

        if index.labels.len() != declared {
            return Err(PerceptronError::class_count(declared, index.labels.len()));
        }
        Ok(index)
    }

    /// Index over an explicit label list, in the given order
    pub fn from_labels(labels: Vec<L>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if positions.insert(label.clone(), i).is_some() {
                return Err(PerceptronError::InvalidParameter(format!(
                    "duplicate label at class index {i}"
                )));
            }
        }
        Ok(Self { labels, positions })
    }

    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.positions.get(label).copied()
    }
}

impl<L> ClassIndex<L> {
    /// Number of classes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&L> {
        self.labels.get(index)
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }
}

impl<L: Serialize> Serialize for ClassIndex<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.labels.serialize(serializer)
    }
}

impl<'de, L> Deserialize<'de> for ClassIndex<L>
where
    L: Deserialize<'de> + Clone + Eq + Hash,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let labels = Vec::<L>::deserialize(deserializer)?;
        ClassIndex::from_labels(labels).map_err(D::Error::custom)
    }
}
