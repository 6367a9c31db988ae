//! Utility functions for perceptron operations

/// Dense vector arithmetic on `f64` slices
///
/// Callers check shapes with [`vector::ensure_same_dim`] before using the
/// unchecked helpers; the helpers only debug-assert.
pub mod vector {
    use crate::core::{PerceptronError, Result};

    /// Fail with `DimensionMismatch` unless `actual == expected`
    pub fn ensure_same_dim(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(PerceptronError::DimensionMismatch { expected, actual })
        }
    }

    /// Inner product x·y
    pub fn dot(x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        x.iter().zip(y).map(|(a, b)| a * b).sum()
    }

    /// Squared Euclidean distance ||x - y||²
    pub fn squared_distance(x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        x.iter()
            .zip(y)
            .map(|(a, b)| {
                let diff = a - b;
                diff * diff
            })
            .sum()
    }

    /// w += x
    pub fn add_assign(w: &mut [f64], x: &[f64]) {
        debug_assert_eq!(w.len(), x.len());
        w.iter_mut().zip(x).for_each(|(wi, xi)| *wi += xi);
    }

    /// w -= x
    pub fn sub_assign(w: &mut [f64], x: &[f64]) {
        debug_assert_eq!(w.len(), x.len());
        w.iter_mut().zip(x).for_each(|(wi, xi)| *wi -= xi);
    }

    /// Arithmetic mean of the components, 0 for an empty vector
    pub fn mean(x: &[f64]) -> f64 {
        if x.is_empty() {
            0.0
        } else {
            x.iter().sum::<f64>() / x.len() as f64
        }
    }
}

/// Label statistics used for logging
pub mod stats {
    use crate::core::Dataset;

    /// Count positive and negative examples of a binary dataset
    pub fn polarity_counts(dataset: &Dataset<bool>) -> (usize, usize) {
        let positive = dataset.iter().filter(|e| e.label).count();
        (positive, dataset.len() - positive)
    }
}

/// Memory management utilities
pub mod memory {
    /// Bytes needed to cache every pairwise kernel value of `n_examples`
    ///
    /// Only the upper triangle is stored since the matrix is symmetric.
    pub fn estimate_gram_cache_memory(n_examples: usize) -> usize {
        let entries = n_examples * (n_examples + 1) / 2;
        entries * BYTES_PER_ENTRY
    }

    /// Key (two indices) plus value plus LRU bookkeeping, approximately
    pub const BYTES_PER_ENTRY: usize = 16;
}
