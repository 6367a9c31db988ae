//! Model serialization and persistence
//!
//! Trained models are saved as pretty-printed JSON together with the class
//! labels they predict and some metadata. A kernel model only borrows its
//! training set in memory, so the saved form carries its own copy.

use crate::core::{Classifier, Dataset, PerceptronError, Prediction, Result};
use crate::kernel::{Kernel, KernelFunction};
use crate::perceptron::{
    BinaryConfig, BinaryModel, KernelConfig, KernelModel, MulticlassConfig, MulticlassModel,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable trained model with the labels it predicts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "L: Serialize",
    deserialize = "L: Deserialize<'de> + Clone + Eq + Hash"
))]
pub struct SerializableModel<L> {
    pub model: SavedModel<L>,
    /// `[positive, negative]` for two-class models, class-index order otherwise
    pub class_labels: Vec<L>,
    pub metadata: ModelMetadata,
}

/// The trained model itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(bound(
    serialize = "L: Serialize",
    deserialize = "L: Deserialize<'de> + Clone + Eq + Hash"
))]
pub enum SavedModel<L> {
    Binary(BinaryModel),
    Multiclass(MulticlassModel<L>),
    Kernel(SavedKernelModel),
}

/// Kernel perceptron detached from the lifetime of its training set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedKernelModel {
    pub kernel: KernelFunction,
    pub alpha: Vec<u32>,
    pub training: Dataset<bool>,
}

impl SavedKernelModel {
    /// Copy the training set out of a trained model
    pub fn from_model<K>(model: &KernelModel<'_, K>) -> Self
    where
        K: Kernel + Clone + Into<KernelFunction>,
    {
        Self {
            kernel: model.kernel().clone().into(),
            alpha: model.alpha().to_vec(),
            training: model.training_set().clone(),
        }
    }

    /// A model borrowing the stored training set
    pub fn model(&self) -> Result<KernelModel<'_, KernelFunction>> {
        let kernel = self.kernel.validate()?;
        KernelModel::from_parts(kernel, self.alpha.clone(), &self.training)
    }
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Number of examples the model was trained on
    pub n_examples: usize,
    /// Epochs the training loop actually ran
    pub epochs_run: usize,
    pub training_params: TrainingParams,
}

impl ModelMetadata {
    fn new(n_examples: usize, epochs_run: usize, training_params: TrainingParams) -> Self {
        Self {
            library_version: crate::VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            n_examples,
            epochs_run,
            training_params,
        }
    }
}

/// Training parameters for reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum TrainingParams {
    Binary(BinaryConfig),
    Multiclass(MulticlassConfig),
    Kernel {
        kernel: KernelFunction,
        epochs: usize,
        cache_size: usize,
    },
}

impl<L> SerializableModel<L> {
    /// Wrap a binary model; `positive` is predicted for `true`
    pub fn from_binary(
        model: BinaryModel,
        config: &BinaryConfig,
        n_examples: usize,
        positive: L,
        negative: L,
    ) -> Self {
        let metadata = ModelMetadata::new(
            n_examples,
            model.epochs_run(),
            TrainingParams::Binary(config.clone()),
        );
        Self {
            model: SavedModel::Binary(model),
            class_labels: vec![positive, negative],
            metadata,
        }
    }

    /// Wrap a kernel model; `positive` is predicted for `true`
    pub fn from_kernel<K>(
        model: &KernelModel<'_, K>,
        config: &KernelConfig,
        epochs: usize,
        positive: L,
        negative: L,
    ) -> Self
    where
        K: Kernel + Clone + Into<KernelFunction>,
    {
        let saved = SavedKernelModel::from_model(model);
        let metadata = ModelMetadata::new(
            saved.training.len(),
            model.epochs_run(),
            TrainingParams::Kernel {
                kernel: saved.kernel,
                epochs,
                cache_size: config.cache_size,
            },
        );
        Self {
            model: SavedModel::Kernel(saved),
            class_labels: vec![positive, negative],
            metadata,
        }
    }

    /// Short name of the algorithm
    pub fn algorithm(&self) -> &'static str {
        match self.model {
            SavedModel::Binary(_) => "binary",
            SavedModel::Multiclass(_) => "multiclass",
            SavedModel::Kernel(_) => "kernel",
        }
    }

    /// Feature dimension the model expects
    pub fn dim(&self) -> usize {
        match &self.model {
            SavedModel::Binary(m) => m.dim(),
            SavedModel::Multiclass(m) => m.weights().dim(),
            SavedModel::Kernel(m) => m.training.dim(),
        }
    }
}

impl<L: Clone> SerializableModel<L> {
    /// Wrap a multi-class model
    pub fn from_multiclass(
        model: MulticlassModel<L>,
        config: &MulticlassConfig,
        n_examples: usize,
    ) -> Self {
        let metadata = ModelMetadata::new(
            n_examples,
            model.mistakes_per_epoch().len(),
            TrainingParams::Multiclass(config.clone()),
        );
        Self {
            class_labels: model.classes().labels().to_vec(),
            model: SavedModel::Multiclass(model),
            metadata,
        }
    }
}

impl<L: Clone + PartialEq> SerializableModel<L> {
    /// A classifier predicting this model's labels
    ///
    /// Fails if the stored labels or kernel are inconsistent with the model.
    pub fn classifier(&self) -> Result<LoadedModel<'_, L>> {
        match &self.model {
            SavedModel::Binary(model) => Ok(LoadedModel::Binary {
                model,
                labels: self.two_labels()?,
            }),
            SavedModel::Multiclass(model) => {
                if model.classes().labels() != self.class_labels.as_slice() {
                    return Err(PerceptronError::Serialization(
                        "class labels do not match the model's class index".to_string(),
                    ));
                }
                Ok(LoadedModel::Multiclass(model))
            }
            SavedModel::Kernel(saved) => Ok(LoadedModel::Kernel {
                model: saved.model()?,
                labels: self.two_labels()?,
            }),
        }
    }

    fn two_labels(&self) -> Result<&[L; 2]> {
        <&[L; 2]>::try_from(self.class_labels.as_slice()).map_err(|_| {
            PerceptronError::Serialization(format!(
                "two-class model stores {} class labels",
                self.class_labels.len()
            ))
        })
    }
}

impl<L: Serialize> SerializableModel<L> {
    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| PerceptronError::Serialization(e.to_string()))?;
        Ok(())
    }
}

impl<L: DeserializeOwned + Clone + Eq + Hash> SerializableModel<L> {
    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| PerceptronError::Serialization(e.to_string()))?;
        Ok(model)
    }
}

impl<L: Display> SerializableModel<L> {
    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== Perceptron Model Summary ===");
        println!("Algorithm: {}", self.algorithm());
        println!("Dimensions: {}", self.dim());
        let labels: Vec<String> = self.class_labels.iter().map(|l| l.to_string()).collect();
        println!("Classes: {}", labels.join(", "));

        match &self.model {
            SavedModel::Binary(m) => {
                println!("Bias: {:.6}", m.bias());
                println!("Converged: {}", m.converged());
            }
            SavedModel::Multiclass(m) => {
                println!("Bias Column: {}", m.weights().has_bias());
                if let Some(last) = m.mistakes_per_epoch().last() {
                    println!("Mistakes In Last Epoch: {last}");
                }
            }
            SavedModel::Kernel(m) => {
                match m.kernel.hyperparameter() {
                    Some(h) => println!("Kernel: {} ({h})", m.kernel.name()),
                    None => println!("Kernel: {}", m.kernel.name()),
                }
                let n_support = m.alpha.iter().filter(|&&a| a > 0).count();
                println!("Support Examples: {} / {}", n_support, m.alpha.len());
            }
        }

        println!("Training Examples: {}", self.metadata.n_examples);
        println!("Epochs Run: {}", self.metadata.epochs_run);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}

/// A loaded model predicting the labels it was saved with
#[derive(Debug)]
pub enum LoadedModel<'m, L> {
    Binary {
        model: &'m BinaryModel,
        labels: &'m [L; 2],
    },
    Multiclass(&'m MulticlassModel<L>),
    Kernel {
        model: KernelModel<'m, KernelFunction>,
        labels: &'m [L; 2],
    },
}

fn two_class<L: Clone>(labels: &[L; 2], prediction: Prediction<bool>) -> Prediction<L> {
    let label = if prediction.label { &labels[0] } else { &labels[1] };
    Prediction::new(label.clone(), prediction.decision_value)
}

impl<L: Clone + PartialEq> Classifier for LoadedModel<'_, L> {
    type Label = L;

    fn dim(&self) -> usize {
        match self {
            Self::Binary { model, .. } => model.dim(),
            Self::Multiclass(model) => model.dim(),
            Self::Kernel { model, .. } => model.dim(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction<L>> {
        match self {
            Self::Binary { model, labels } => Ok(two_class(labels, model.predict(features)?)),
            Self::Multiclass(model) => model.predict(features),
            Self::Kernel { model, labels } => Ok(two_class(labels, model.predict(features)?)),
        }
    }
}
