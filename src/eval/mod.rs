//! Scoring of trained models on held-out examples
//!
//! Works with any [`Classifier`]. The misclassification listing is a lazy
//! iterator: each call to [`Evaluator::misclassified`] runs the model again,
//! nothing is cached between passes.

use crate::core::{Classifier, Dataset, Example, PerceptronError, Result};

/// Error count and rate of a model on a dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub errors: usize,
    pub total: usize,
    pub error_rate: f64,
}

impl Score {
    fn new(errors: usize, total: usize) -> Self {
        Self {
            errors,
            total,
            error_rate: errors as f64 / total as f64,
        }
    }

    /// 1 - error rate
    pub fn accuracy(&self) -> f64 {
        1.0 - self.error_rate
    }
}

/// An example the model got wrong
#[derive(Debug, Clone, PartialEq)]
pub struct Misclassification<'d, L> {
    /// Position of the example in the evaluated dataset
    pub position: usize,
    pub example: &'d Example<L>,
    pub predicted: L,
    pub decision_value: f64,
}

impl<L> Misclassification<'_, L> {
    pub fn true_label(&self) -> &L {
        &self.example.label
    }
}

/// Scores a model against labeled examples
pub struct Evaluator<'m, C: Classifier> {
    model: &'m C,
}

impl<'m, C: Classifier> Evaluator<'m, C> {
    pub fn new(model: &'m C) -> Self {
        Self { model }
    }

    /// Count errors over `dataset`
    ///
    /// Fails with `EmptyDataset` on an empty dataset and with
    /// `DimensionMismatch` if the dataset does not fit the model.
    pub fn score(&self, dataset: &Dataset<C::Label>) -> Result<Score> {
        dataset.ensure_not_empty()?;
        self.check_dim(dataset)?;

        let mut errors = 0;
        for example in dataset {
            if self.model.predict(&example.features)?.label != example.label {
                errors += 1;
            }
        }
        Ok(Score::new(errors, dataset.len()))
    }

    /// Lazily list the examples of `dataset` the model gets wrong
    pub fn misclassified<'d>(&self, dataset: &'d Dataset<C::Label>) -> Misclassified<'m, 'd, C> {
        Misclassified {
            model: self.model,
            examples: dataset.examples().iter().enumerate(),
        }
    }

    fn check_dim(&self, dataset: &Dataset<C::Label>) -> Result<()> {
        if dataset.dim() != self.model.dim() {
            return Err(PerceptronError::DimensionMismatch {
                expected: self.model.dim(),
                actual: dataset.dim(),
            });
        }
        Ok(())
    }
}

/// Iterator over misclassified examples, see [`Evaluator::misclassified`]
///
/// Yields `Err` if the model fails on an example; iteration may continue
/// past it.
pub struct Misclassified<'m, 'd, C: Classifier> {
    model: &'m C,
    examples: std::iter::Enumerate<std::slice::Iter<'d, Example<C::Label>>>,
}

impl<'d, C: Classifier> Iterator for Misclassified<'_, 'd, C> {
    type Item = Result<Misclassification<'d, C::Label>>;

    fn next(&mut self) -> Option<Self::Item> {
        for (position, example) in self.examples.by_ref() {
            match self.model.predict(&example.features) {
                Ok(prediction) if prediction.label == example.label => continue,
                Ok(prediction) => {
                    return Some(Ok(Misclassification {
                        position,
                        example,
                        predicted: prediction.label,
                        decision_value: prediction.decision_value,
                    }))
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Prediction;
    use std::cell::Cell;

    /// Predicts `true` iff the first feature is positive and counts calls
    struct ThresholdModel {
        calls: Cell<usize>,
    }

    impl ThresholdModel {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Classifier for ThresholdModel {
        type Label = bool;

        fn dim(&self) -> usize {
            1
        }

        fn predict(&self, features: &[f64]) -> Result<Prediction<bool>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Prediction::new(features[0] > 0.0, features[0]))
        }
    }

    fn dataset(labels: &[(f64, bool)]) -> Dataset<bool> {
        Dataset::from_pairs(labels.iter().map(|&(x, y)| (vec![x], y))).unwrap()
    }

    #[test]
    fn test_all_correct_and_all_wrong() {
        let model = ThresholdModel::new();
        let evaluator = Evaluator::new(&model);

        let right = dataset(&[(1.0, true), (-1.0, false), (2.0, true)]);
        let score = evaluator.score(&right).unwrap();
        assert_eq!(score.errors, 0);
        assert_eq!(score.error_rate, 0.0);
        assert_eq!(score.accuracy(), 1.0);

        let wrong = dataset(&[(1.0, false), (-1.0, true), (2.0, false)]);
        let score = evaluator.score(&wrong).unwrap();
        assert_eq!(score.errors, 3);
        assert_eq!(score.total, 3);
        assert_eq!(score.error_rate, 1.0);
    }

    #[test]
    fn test_partial_error_rate() {
        let model = ThresholdModel::new();
        let score = Evaluator::new(&model)
            .score(&dataset(&[(1.0, true), (1.0, false), (-1.0, false), (-1.0, true)]))
            .unwrap();
        assert_eq!(score.errors, 2);
        assert_eq!(score.error_rate, 0.5);
    }

    #[test]
    fn test_score_rejects_empty_and_mismatched() {
        let model = ThresholdModel::new();
        let evaluator = Evaluator::new(&model);

        let empty: Dataset<bool> = Dataset::new(Vec::new()).unwrap();
        assert!(matches!(
            evaluator.score(&empty),
            Err(PerceptronError::EmptyDataset)
        ));

        let wide = Dataset::from_pairs(vec![(vec![1.0, 2.0], true)]).unwrap();
        assert!(matches!(
            evaluator.score(&wide),
            Err(PerceptronError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_misclassified_lists_wrong_examples() {
        let model = ThresholdModel::new();
        let data = dataset(&[(1.0, true), (2.0, false), (-1.0, false), (-3.0, true)]);

        let wrong: Vec<_> = Evaluator::new(&model)
            .misclassified(&data)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(wrong.len(), 2);
        assert_eq!(wrong[0].position, 1);
        assert!(wrong[0].predicted);
        assert!(!*wrong[0].true_label());
        assert_eq!(wrong[1].position, 3);
        assert_eq!(wrong[1].decision_value, -3.0);
    }

    #[test]
    fn test_misclassified_is_lazy_and_recomputes() {
        let model = ThresholdModel::new();
        let data = dataset(&[(1.0, false), (2.0, false), (3.0, false)]);
        let evaluator = Evaluator::new(&model);

        let first = evaluator.misclassified(&data).next();
        assert!(first.is_some());
        assert_eq!(model.calls.get(), 1);

        let mut pass = evaluator.misclassified(&data);
        assert_eq!(pass.by_ref().count(), 3);
        assert!(pass.next().is_none());
        assert_eq!(model.calls.get(), 4);

        assert_eq!(evaluator.misclassified(&data).count(), 3);
        assert_eq!(model.calls.get(), 7);
    }
}
