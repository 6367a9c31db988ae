//! Integration tests for the rperceptron library
//!
//! These tests verify end-to-end functionality across multiple modules
//! and validate real-world usage scenarios.

use approx::assert_relative_eq;
use rperceptron::{
    BinaryPerceptron, ClassIndex, Classifier, CsvDataset, Dataset, Evaluator, GaussianKernel,
    Kernel, KernelFunction, KernelPerceptron, LinearKernel, MulticlassPerceptron,
    PerceptronError, PolynomialKernel, SerializableModel,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn four_points() -> Dataset<&'static str> {
    Dataset::from_pairs(vec![
        (vec![0.0, 0.0], "A"),
        (vec![0.0, 1.0], "A"),
        (vec![5.0, 5.0], "B"),
        (vec![5.0, 6.0], "B"),
    ])
    .unwrap()
}

fn xor() -> Dataset<bool> {
    Dataset::from_pairs(vec![
        (vec![0.0, 0.0], false),
        (vec![1.0, 1.0], false),
        (vec![0.0, 1.0], true),
        (vec![1.0, 0.0], true),
    ])
    .unwrap()
}

#[test]
fn test_multiclass_four_points_ten_epochs() {
    let data = four_points();
    let model = MulticlassPerceptron::new(2)
        .with_epochs(10)
        .train(&data)
        .expect("Training should succeed");

    for example in &data {
        assert_eq!(
            model.predict(&example.features).unwrap().label,
            example.label
        );
    }
    let score = Evaluator::new(&model).score(&data).unwrap();
    assert_eq!(score.errors, 0);
    assert_eq!(model.mistakes_per_epoch(), &[1, 1, 1, 1, 1, 1, 0, 0, 0, 0]);
}

#[test]
fn test_multiclass_no_update_once_separated() {
    let data = four_points();
    let short = MulticlassPerceptron::new(2).with_epochs(7).train(&data).unwrap();
    let long = MulticlassPerceptron::new(2).with_epochs(50).train(&data).unwrap();

    assert_eq!(short.weights(), long.weights());
    assert!(long.mistakes_per_epoch()[7..].iter().all(|&m| m == 0));
}

#[test]
fn test_multiclass_three_classes_with_bias() {
    let data = Dataset::from_pairs(vec![
        (vec![0.0, 5.0], "north"),
        (vec![5.0, 0.0], "east"),
        (vec![-5.0, 0.0], "west"),
        (vec![0.5, 6.0], "north"),
        (vec![6.0, -0.5], "east"),
        (vec![-6.0, 0.5], "west"),
    ])
    .unwrap();

    let model = MulticlassPerceptron::new(3)
        .with_bias(true)
        .with_epochs(20)
        .train(&data)
        .unwrap();

    assert!(model.weights().has_bias());
    assert_eq!(model.classes().labels(), &["north", "east", "west"]);
    assert_eq!(Evaluator::new(&model).score(&data).unwrap().errors, 0);
}

#[test]
fn test_multiclass_class_count_checked_before_training() {
    let data = four_points();
    match MulticlassPerceptron::new(3).train(&data) {
        Err(PerceptronError::InvalidClassCount {
            expected, found, ..
        }) => {
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("expected InvalidClassCount, got {other:?}"),
    }

    let index = ClassIndex::from_labels(vec!["A", "C"]).unwrap();
    assert!(matches!(
        MulticlassPerceptron::new(2).train_with_index(&data, index),
        Err(PerceptronError::UnknownLabel { position: 2 })
    ));
}

#[test]
fn test_binary_single_example_one_epoch_terminates() {
    let data = Dataset::from_pairs(vec![(vec![1.0, 2.0], true)]).unwrap();
    let model = BinaryPerceptron::new()
        .with_max_epochs(1)
        .train(&data)
        .expect("Training should succeed");

    assert_eq!(model.weights().len(), 2);
    assert_eq!(model.weights(), &[1.0, 2.0]);
    assert_eq!(model.epochs_run(), 1);
}

#[test]
fn test_binary_separable_data_zero_errors() {
    let datasets = vec![
        vec![
            (vec![2.0, 1.0], true),
            (vec![1.8, 1.1], true),
            (vec![2.2, 0.9], true),
            (vec![-2.0, -1.0], false),
            (vec![-1.8, -1.1], false),
            (vec![-2.2, -0.9], false),
        ],
        vec![
            (vec![3.0, 0.0, 1.5], true),
            (vec![3.2, -0.1, 1.6], true),
            (vec![-3.0, 0.0, -1.5], false),
            (vec![-2.8, -0.1, -1.4], false),
        ],
        vec![(vec![1.0], true), (vec![-1.0], false)],
    ];

    for pairs in datasets {
        let data = Dataset::from_pairs(pairs).unwrap();
        let model = BinaryPerceptron::new()
            .with_max_epochs(100)
            .train(&data)
            .unwrap();
        assert!(model.converged());
        assert_eq!(Evaluator::new(&model).score(&data).unwrap().errors, 0);
    }
}

#[test]
fn test_trainers_reject_empty_dataset() {
    let empty_bool: Dataset<bool> = Dataset::new(Vec::new()).unwrap();
    let empty_str: Dataset<&str> = Dataset::new(Vec::new()).unwrap();

    assert!(matches!(
        BinaryPerceptron::new().train(&empty_bool),
        Err(PerceptronError::EmptyDataset)
    ));
    assert!(matches!(
        MulticlassPerceptron::new(2).train(&empty_str),
        Err(PerceptronError::EmptyDataset)
    ));
    assert!(matches!(
        KernelPerceptron::new(LinearKernel).train(&empty_bool),
        Err(PerceptronError::EmptyDataset)
    ));
}

#[test]
fn test_score_all_wrong_and_all_right() {
    let data = Dataset::from_pairs(vec![
        (vec![2.0, 1.0], true),
        (vec![-2.0, -1.0], false),
        (vec![1.5, 0.8], true),
    ])
    .unwrap();
    let model = BinaryPerceptron::new().train(&data).unwrap();
    let evaluator = Evaluator::new(&model);

    let right = evaluator.score(&data).unwrap();
    assert_eq!(right.error_rate, 0.0);

    let flipped = data.map_labels(|&label| !label);
    let wrong = evaluator.score(&flipped).unwrap();
    assert_eq!(wrong.errors, 3);
    assert_eq!(wrong.error_rate, 1.0);

    let listed: Vec<usize> = evaluator
        .misclassified(&flipped)
        .map(|m| m.unwrap().position)
        .collect();
    assert_eq!(listed, vec![0, 1, 2]);

    // Stopping early is fine
    let first = evaluator.misclassified(&flipped).next().unwrap().unwrap();
    assert_eq!(first.position, 0);
    assert!(!first.predicted.eq(first.true_label()));
}

#[test]
fn test_kernel_single_example() {
    for label in [true, false] {
        let data = Dataset::from_pairs(vec![(vec![0.3, -1.2], label)]).unwrap();
        let model = KernelPerceptron::new(GaussianKernel::new(1.0).unwrap())
            .train(&data)
            .expect("Training on one example should succeed");
        assert_eq!(model.alpha().len(), 1);
    }
}

#[test]
fn test_kernel_perceptron_solves_xor() {
    let data = xor();

    let gaussian = KernelPerceptron::new(GaussianKernel::new(1.0).unwrap())
        .train(&data)
        .unwrap();
    assert!(gaussian.converged());
    assert_eq!(Evaluator::new(&gaussian).score(&data).unwrap().errors, 0);

    // A linear model cannot separate XOR
    let linear = BinaryPerceptron::new().with_max_epochs(50).train(&data).unwrap();
    assert!(Evaluator::new(&linear).score(&data).unwrap().errors > 0);
}

#[test]
fn test_kernel_cache_does_not_change_results() {
    let data = Dataset::from_pairs(vec![
        (vec![0.0, 0.0], false),
        (vec![1.0, 1.0], false),
        (vec![0.0, 1.0], true),
        (vec![1.0, 0.0], true),
        (vec![0.5, 0.4], false),
        (vec![0.9, 0.1], true),
    ])
    .unwrap();
    let kernel = KernelFunction::polynomial(2.0).unwrap();

    let cached = KernelPerceptron::new(kernel).with_epochs(20).train(&data).unwrap();
    let uncached = KernelPerceptron::new(kernel)
        .with_epochs(20)
        .with_cache_size(0)
        .train(&data)
        .unwrap();

    assert_eq!(cached.alpha(), uncached.alpha());
    assert!(cached.cache_stats().is_some());
    assert!(uncached.cache_stats().is_none());
}

#[test]
fn test_gaussian_kernel_properties() {
    let vectors = [
        vec![0.0, 0.0, 0.0],
        vec![1.0, -2.0, 0.5],
        vec![3.5, 0.25, -1.0],
        vec![-0.1, 10.0, 2.0],
    ];
    for sigma in [0.5, 1.0, 3.0] {
        let kernel = GaussianKernel::new(sigma).unwrap();
        for a in &vectors {
            assert_relative_eq!(kernel.compute(a, a).unwrap(), 1.0);
            for b in &vectors {
                let ab = kernel.compute(a, b).unwrap();
                assert_eq!(ab, kernel.compute(b, a).unwrap());
                assert!(ab >= 0.0 && ab <= 1.0);
            }
        }
    }
}

#[test]
fn test_kernel_dimension_mismatch() {
    let polynomial = PolynomialKernel::new(3.0).unwrap();
    assert!(matches!(
        polynomial.compute(&[1.0, 2.0], &[1.0]),
        Err(PerceptronError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        GaussianKernel::default().compute(&[1.0], &[1.0, 2.0, 3.0]),
        Err(PerceptronError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_invalid_hyperparameters() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            GaussianKernel::new(bad),
            Err(PerceptronError::InvalidParameter(_))
        ));
        assert!(matches!(
            PolynomialKernel::new(bad),
            Err(PerceptronError::InvalidParameter(_))
        ));
    }
    assert!(matches!(
        MulticlassPerceptron::new(2).with_epochs(0).train(&four_points()),
        Err(PerceptronError::InvalidParameter(_))
    ));
}

#[test]
fn test_csv_to_saved_model_workflow() {
    let mut train_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(train_file, "# petal measurements").expect("Failed to write");
    writeln!(train_file, "length,width,species").expect("Failed to write");
    writeln!(train_file, "1.4,0.2,setosa").expect("Failed to write");
    writeln!(train_file, "4.7,1.4,versicolor").expect("Failed to write");
    writeln!(train_file, "1.3,0.2,setosa").expect("Failed to write");
    writeln!(train_file, "4.5,1.5,versicolor").expect("Failed to write");
    writeln!(train_file, "1.5,0.3,setosa").expect("Failed to write");
    writeln!(train_file, "4.9,1.5,versicolor").expect("Failed to write");
    train_file.flush().expect("Failed to flush");

    let data = CsvDataset::from_file(train_file.path())
        .expect("CSV loading should succeed")
        .into_dataset();
    assert_eq!(data.len(), 6);
    assert_eq!(data.dim(), 2);

    let trainer = MulticlassPerceptron::new(2).with_bias(true).with_epochs(30);
    let model = trainer.train(&data).unwrap();
    let saved = SerializableModel::from_multiclass(model, trainer.config(), data.len());

    let model_file = NamedTempFile::new().expect("Failed to create temp file");
    saved.save_to_file(model_file.path()).unwrap();
    let loaded: SerializableModel<String> =
        SerializableModel::load_from_file(model_file.path()).unwrap();

    assert_eq!(
        loaded.class_labels,
        vec!["setosa".to_string(), "versicolor".to_string()]
    );
    let classifier = loaded.classifier().unwrap();
    let score = Evaluator::new(&classifier).score(&data).unwrap();
    assert_eq!(score.errors, 0);
    assert_eq!(classifier.predict(&[1.4, 0.25]).unwrap().label, "setosa");
}

#[test]
fn test_saved_kernel_model_predicts_like_original() {
    let data = xor();
    let trainer = KernelPerceptron::new(GaussianKernel::new(1.0).unwrap());
    let epochs = trainer.effective_epochs(&data).unwrap();
    let model = trainer.train(&data).unwrap();

    let saved = SerializableModel::from_kernel(&model, trainer.config(), epochs, "odd", "even");
    let model_file = NamedTempFile::new().expect("Failed to create temp file");
    saved.save_to_file(model_file.path()).unwrap();

    let loaded: SerializableModel<String> =
        SerializableModel::load_from_file(model_file.path()).unwrap();
    let classifier = loaded.classifier().unwrap();

    for point in [[0.1, 0.9], [0.9, 0.9], [0.2, 0.1], [0.8, 0.3]] {
        let expected = model.predict(&point).unwrap();
        let restored = classifier.predict(&point).unwrap();
        assert_relative_eq!(restored.decision_value, expected.decision_value);
        let label = if expected.label { "odd" } else { "even" };
        assert_eq!(restored.label, label);
    }
}
