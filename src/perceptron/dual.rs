//! Kernel perceptron in dual form
//!
//! The model is a vector of mistake counts `alpha`, one per training example,
//! and the decision function for `x` is
//!
//! ```text
//! f(x) = Σ_j alpha_j · y_j · k(x, x_j)        y_j ∈ {+1, -1}
//! ```
//!
//! Each epoch evaluates `f(x_i)` for every training example against every
//! other one, so an epoch costs O(n²) kernel evaluations and a prediction
//! costs O(n). Pairwise values are kept in a [`GramCache`] across epochs.
//!
//! Training is strictly sequential: an increment of `alpha_i` is already
//! visible when `f(x_{i+1})` is computed in the same epoch. A zero activation
//! counts as the negative polarity. Counts never decrease.

use crate::cache::{CacheStats, GramCache};
use crate::core::{Classifier, Dataset, PerceptronError, Polarity, Prediction, Result};
use crate::kernel::Kernel;
use crate::utils::memory::estimate_gram_cache_memory;
use crate::utils::stats::polarity_counts;
use crate::utils::vector::ensure_same_dim;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Configuration for the kernel perceptron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Number of passes; `None` means one pass per feature value (n × d)
    pub epochs: Option<usize>,
    /// Gram cache size in bytes, 0 disables caching
    pub cache_size: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            epochs: None,
            cache_size: 64 * 1024 * 1024, // 64MB
        }
    }
}

/// Trainer for [`KernelModel`]
#[derive(Debug, Clone)]
pub struct KernelPerceptron<K: Kernel> {
    kernel: K,
    config: KernelConfig,
}

impl<K: Kernel + Clone> KernelPerceptron<K> {
    /// Create a trainer using `kernel`
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            config: KernelConfig::default(),
        }
    }

    pub fn with_config(kernel: K, config: KernelConfig) -> Self {
        Self { kernel, config }
    }

    /// Set a fixed number of epochs
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = Some(epochs);
        self
    }

    /// Set the Gram cache size in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Epoch budget for `dataset`
    pub fn effective_epochs(&self, dataset: &Dataset<bool>) -> Result<usize> {
        match self.config.epochs {
            Some(0) => Err(PerceptronError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            )),
            Some(epochs) => Ok(epochs),
            None => Ok((dataset.len() * dataset.dim()).max(1)),
        }
    }

    /// Train on examples labeled `true` (positive) or `false` (negative)
    ///
    /// The returned model borrows `dataset`: predictions are weighted sums
    /// over the training examples themselves.
    pub fn train<'a>(&self, dataset: &'a Dataset<bool>) -> Result<KernelModel<'a, K>> {
        dataset.ensure_not_empty()?;
        let epochs = self.effective_epochs(dataset)?;

        let examples = dataset.examples();
        let n = examples.len();
        let signs: Vec<f64> = examples
            .iter()
            .map(|e| Polarity::from(e.label).signum())
            .collect();

        let (positive, negative) = polarity_counts(dataset);
        debug!(
            "Training {} kernel perceptron on {} examples ({} positive, {} negative) for up to {} epochs",
            self.kernel.name(),
            n,
            positive,
            negative,
            epochs
        );

        // Never larger than the full upper triangle
        let cache_bytes = self.config.cache_size.min(estimate_gram_cache_memory(n));
        let mut cache = GramCache::with_memory_limit(cache_bytes);
        let mut alpha = vec![0u32; n];
        let mut epochs_run = 0;
        let mut converged = false;

        while epochs_run < epochs {
            epochs_run += 1;
            let mut mistakes = 0;

            for i in 0..n {
                let xi = &examples[i].features;
                let mut activation = 0.0;

                for j in 0..n {
                    // Zero counts contribute nothing
                    if alpha[j] == 0 {
                        continue;
                    }
                    let xj = &examples[j].features;
                    let k = match cache.as_mut() {
                        Some(cache) => {
                            cache.get_or_insert_with(i, j, || self.kernel.evaluate(xi, xj))
                        }
                        None => self.kernel.evaluate(xi, xj),
                    };
                    activation += f64::from(alpha[j]) * signs[j] * k;
                }

                if Polarity::of(activation) != Polarity::from(examples[i].label) {
                    alpha[i] = alpha[i].saturating_add(1);
                    mistakes += 1;
                }
            }

            debug!("Epoch {epochs_run}: {mistakes} mistakes");
            // An epoch without mistakes leaves alpha unchanged, so every
            // further epoch would repeat it exactly
            if mistakes == 0 {
                converged = true;
                break;
            }
        }

        let cache_stats = cache.as_ref().map(GramCache::stats);
        info!(
            "Kernel perceptron finished after {} epochs (converged: {}), {} of {} examples carry weight{}",
            epochs_run,
            converged,
            alpha.iter().filter(|&&a| a > 0).count(),
            n,
            cache
                .as_ref()
                .map(|c| format!(", cache hit rate {:.2}%", c.hit_rate() * 100.0))
                .unwrap_or_default()
        );

        Ok(KernelModel {
            kernel: self.kernel.clone(),
            alpha,
            training: dataset,
            epochs_run,
            converged,
            cache_stats,
        })
    }
}

/// Trained kernel perceptron tied to the training set it was learned from
#[derive(Debug, Clone)]
pub struct KernelModel<'a, K: Kernel> {
    kernel: K,
    alpha: Vec<u32>,
    training: &'a Dataset<bool>,
    epochs_run: usize,
    converged: bool,
    cache_stats: Option<CacheStats>,
}

impl<'a, K: Kernel> KernelModel<'a, K> {
    /// Reassemble a model from stored mistake counts
    pub fn from_parts(kernel: K, alpha: Vec<u32>, training: &'a Dataset<bool>) -> Result<Self> {
        if alpha.len() != training.len() {
            return Err(PerceptronError::InvalidParameter(format!(
                "{} mistake counts for {} training examples",
                alpha.len(),
                training.len()
            )));
        }
        Ok(Self {
            kernel,
            alpha,
            training,
            epochs_run: 0,
            converged: false,
            cache_stats: None,
        })
    }

    /// Mistake count of each training example
    pub fn alpha(&self) -> &[u32] {
        &self.alpha
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn training_set(&self) -> &'a Dataset<bool> {
        self.training
    }

    /// Number of epochs run; 0 for a reassembled model
    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Gram cache statistics of the training run, if caching was enabled
    pub fn cache_stats(&self) -> Option<&CacheStats> {
        self.cache_stats.as_ref()
    }

    /// Number of training examples with a non-zero count
    pub fn n_support(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0).count()
    }

    /// Σ_j alpha_j · y_j · k(x, x_j) over the whole training set
    pub fn decision_value(&self, features: &[f64]) -> Result<f64> {
        ensure_same_dim(self.training.dim(), features.len())?;
        Ok(self
            .training
            .iter()
            .zip(&self.alpha)
            .filter(|&(_, &a)| a > 0)
            .map(|(example, &a)| {
                f64::from(a)
                    * Polarity::from(example.label).signum()
                    * self.kernel.evaluate(features, &example.features)
            })
            .sum())
    }
}

impl<K: Kernel> Classifier for KernelModel<'_, K> {
    type Label = bool;

    fn dim(&self) -> usize {
        self.training.dim()
    }

    fn predict(&self, features: &[f64]) -> Result<Prediction<bool>> {
        let value = self.decision_value(features)?;
        Ok(Prediction::new(Polarity::of(value).is_positive(), value))
    }
}
