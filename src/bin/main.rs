//! rperceptron Command Line Interface
//!
//! Train, evaluate and apply perceptron models on CSV data.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use rperceptron::core::{ClassIndex, Classifier, Dataset, PerceptronError, Result};
use rperceptron::eval::Evaluator;
use rperceptron::kernel::{Kernel, KernelFunction};
use rperceptron::perceptron::{BinaryPerceptron, KernelPerceptron, MulticlassPerceptron};
use rperceptron::persistence::{SavedModel, SerializableModel};
use rperceptron::CsvDataset;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "rperceptron")]
#[command(about = "Binary, multi-class and kernel perceptrons")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "rperceptron contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model
    Train(TrainArgs),
    /// Make predictions using a trained model
    Predict(PredictArgs),
    /// Evaluate a model on labeled data
    Evaluate(EvaluateArgs),
    /// Display model information
    Info(InfoArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Algorithm {
    /// Linear perceptron on two classes
    Binary,
    /// One weight row per class
    Multiclass,
    /// Kernel perceptron on two classes
    Kernel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    /// exp(-|x-y|² / σ²)
    Gaussian,
    /// (x·y + 1)^k
    Polynomial,
    /// x·y
    Linear,
}

impl CliKernel {
    fn build(self, param: f64) -> Result<KernelFunction> {
        match self {
            CliKernel::Gaussian => KernelFunction::gaussian(param),
            CliKernel::Polynomial => KernelFunction::polynomial(param),
            CliKernel::Linear => Ok(KernelFunction::linear()),
        }
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Training data file (CSV, last column is the label)
    #[arg(long)]
    data: PathBuf,

    /// Output model file
    #[arg(short, long)]
    output: PathBuf,

    /// Perceptron variant
    #[arg(short, long, value_enum, default_value = "binary")]
    algorithm: Algorithm,

    /// Number of epochs (multiclass: default 10, kernel: default examples × features)
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Epoch bound for the binary perceptron
    #[arg(long, default_value = "10")]
    max_epochs: usize,

    /// Expected number of classes (multiclass; default: number of labels found)
    #[arg(long)]
    classes: Option<usize>,

    /// Append a constant bias feature (multiclass)
    #[arg(long)]
    bias: bool,

    /// Kernel function (kernel)
    #[arg(short, long, value_enum, default_value = "gaussian")]
    kernel: CliKernel,

    /// Kernel hyperparameter: σ for gaussian, degree for polynomial
    #[arg(short, long, default_value = "1.0")]
    param: f64,

    /// Label treated as the positive class (binary, kernel; default: first label seen)
    #[arg(long)]
    positive_label: Option<String>,

    /// Gram cache size in MB (kernel; 0 disables caching)
    #[arg(long, default_value = "64")]
    cache_size: usize,
}

#[derive(Args)]
struct PredictArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Input data file
    #[arg(long)]
    data: PathBuf,

    /// Output predictions file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Trained model file
    #[arg(short, long)]
    model: PathBuf,

    /// Test data file
    #[arg(long)]
    data: PathBuf,

    /// List misclassified examples
    #[arg(long)]
    show_errors: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Train(args) => train_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Evaluate(args) => evaluate_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_csv(path: &Path) -> Result<Dataset<String>> {
    info!("Loading dataset from: {path:?}");
    let dataset = CsvDataset::from_file(path)?.into_dataset();
    info!(
        "Loaded {} examples with {} dimensions",
        dataset.len(),
        dataset.dim()
    );
    Ok(dataset)
}

fn train_command(args: TrainArgs) -> Result<()> {
    if args.algorithm != Algorithm::Multiclass && args.bias {
        warn!("--bias only applies to the multiclass perceptron");
    }

    let dataset = load_csv(&args.data)?;
    info!("Training {:?} perceptron...", args.algorithm);

    let saved = match args.algorithm {
        Algorithm::Binary => train_binary(&args, &dataset)?,
        Algorithm::Multiclass => train_multiclass(&args, &dataset)?,
        Algorithm::Kernel => train_kernel(&args, &dataset)?,
    };

    saved.save_to_file(&args.output)?;
    info!("Model saved to: {:?}", args.output);

    // Quick evaluation on training data
    let classifier = saved.classifier()?;
    let score = Evaluator::new(&classifier).score(&dataset)?;
    info!(
        "Training error rate: {:.2}% ({} / {})",
        score.error_rate * 100.0,
        score.errors,
        score.total
    );

    Ok(())
}

fn train_binary(args: &TrainArgs, dataset: &Dataset<String>) -> Result<SerializableModel<String>> {
    let (positive, negative) = binary_labels(dataset, args.positive_label.as_deref())?;
    info!("Positive class: {positive}, negative class: {negative}");

    let trainer = BinaryPerceptron::new().with_max_epochs(args.max_epochs);
    let binary = dataset.map_labels(|label| *label == positive);
    let model = trainer.train(&binary)?;
    info!(
        "Bias: {:.6}, epochs run: {}",
        model.bias(),
        model.epochs_run()
    );

    Ok(SerializableModel::from_binary(
        model,
        trainer.config(),
        dataset.len(),
        positive,
        negative,
    ))
}

fn train_multiclass(
    args: &TrainArgs,
    dataset: &Dataset<String>,
) -> Result<SerializableModel<String>> {
    let n_classes = match args.classes {
        Some(n) => n,
        None => dataset.iter().map(|e| &e.label).collect::<HashSet<_>>().len(),
    };

    let mut trainer = MulticlassPerceptron::new(n_classes).with_bias(args.bias);
    if let Some(epochs) = args.epochs {
        trainer = trainer.with_epochs(epochs);
    }
    let model = trainer.train(dataset)?;
    info!(
        "Mistakes per epoch: {:?}",
        model.mistakes_per_epoch()
    );

    Ok(SerializableModel::from_multiclass(
        model,
        trainer.config(),
        dataset.len(),
    ))
}

/// Cache budget in bytes, clamped instead of overflowing
fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

fn train_kernel(args: &TrainArgs, dataset: &Dataset<String>) -> Result<SerializableModel<String>> {
    let (positive, negative) = binary_labels(dataset, args.positive_label.as_deref())?;
    info!("Positive class: {positive}, negative class: {negative}");

    let kernel = args.kernel.build(args.param)?;
    if matches!(args.kernel, CliKernel::Linear) && args.param != 1.0 {
        warn!("--param is ignored by the linear kernel");
    }

    let mut trainer = KernelPerceptron::new(kernel).with_cache_size(megabytes(args.cache_size));
    if let Some(epochs) = args.epochs {
        trainer = trainer.with_epochs(epochs);
    }

    let binary = dataset.map_labels(|label| *label == positive);
    let epochs = trainer.effective_epochs(&binary)?;
    let model = trainer.train(&binary)?;
    info!(
        "Support examples: {} / {}",
        model.n_support(),
        binary.len()
    );
    if let Some(stats) = model.cache_stats() {
        info!(
            "Gram cache: {} hits, {} misses",
            stats.hits, stats.misses
        );
    }

    Ok(SerializableModel::from_kernel(
        &model,
        trainer.config(),
        epochs,
        positive,
        negative,
    ))
}

/// Split the two labels of `dataset` into (positive, negative)
fn binary_labels(dataset: &Dataset<String>, positive: Option<&str>) -> Result<(String, String)> {
    let classes = ClassIndex::build(dataset, 2)?;
    let first = classes.labels()[0].clone();
    let second = classes.labels()[1].clone();

    match positive {
        None => Ok((first, second)),
        Some(p) if p == first => Ok((first, second)),
        Some(p) if p == second => Ok((second, first)),
        Some(p) => Err(PerceptronError::InvalidParameter(format!(
            "positive label '{p}' does not occur in the data (labels: {first}, {second})"
        ))),
    }
}

fn predict_command(args: PredictArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let saved: SerializableModel<String> = SerializableModel::load_from_file(&args.model)?;
    let classifier = saved.classifier()?;

    let dataset = load_csv(&args.data)?;
    info!("Making predictions using {} model", saved.algorithm());
    let predictions = classifier.predict_batch(dataset.examples())?;

    // Output results
    match args.output {
        Some(output_path) => {
            let file = File::create(&output_path)?;
            write_predictions(BufWriter::new(file), &predictions)?;
            info!("Predictions saved to: {output_path:?}");
        }
        None => write_predictions(io::stdout().lock(), &predictions)?,
    }

    Ok(())
}

fn write_predictions<W: Write>(
    mut writer: W,
    predictions: &[rperceptron::Prediction<String>],
) -> Result<()> {
    writeln!(writer, "# Predictions for {} examples", predictions.len())?;
    writeln!(writer, "# Format: example_index predicted_label decision_value")?;
    for (i, pred) in predictions.iter().enumerate() {
        writeln!(writer, "{} {} {:.6}", i, pred.label, pred.decision_value)?;
    }
    writer.flush()?;
    Ok(())
}

fn evaluate_command(args: EvaluateArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let saved: SerializableModel<String> = SerializableModel::load_from_file(&args.model)?;
    let classifier = saved.classifier()?;

    let dataset = load_csv(&args.data)?;
    let evaluator = Evaluator::new(&classifier);
    let score = evaluator.score(&dataset)?;

    // Show evaluation results
    println!("=== Model Evaluation ===");
    saved.print_summary();

    println!("\nTest Results:");
    println!("  Examples:   {}", score.total);
    println!("  Errors:     {}", score.errors);
    println!("  Error Rate: {:.2}%", score.error_rate * 100.0);
    println!("  Accuracy:   {:.2}%", score.accuracy() * 100.0);

    if args.show_errors {
        println!("\nMisclassified Examples:");
        for miss in evaluator.misclassified(&dataset) {
            let miss = miss?;
            println!(
                "  #{}: expected {}, predicted {} ({:.6})",
                miss.position,
                miss.true_label(),
                miss.predicted,
                miss.decision_value
            );
        }
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let saved: SerializableModel<String> = SerializableModel::load_from_file(&args.model)?;

    saved.print_summary();

    match &saved.model {
        SavedModel::Binary(model) => {
            println!("\nWeights:");
            print_values(model.weights());
        }
        SavedModel::Multiclass(model) => {
            println!("\nWeight Rows:");
            let weights = model.weights();
            for (i, label) in model.classes().labels().iter().enumerate() {
                println!("  {label}: {:?}", weights.row(i));
            }
        }
        SavedModel::Kernel(model) => {
            println!("\nMistake Counts:");
            let counts: Vec<f64> = model.alpha.iter().map(|&a| f64::from(a)).collect();
            print_values(&counts);
            println!("\nKernel: {}", model.kernel.name());
        }
    }

    Ok(())
}

fn print_values(values: &[f64]) {
    let n_show = values.len().min(10);
    for (i, value) in values.iter().enumerate().take(n_show) {
        println!("  [{i}]: {value:.6}");
    }
    if values.len() > n_show {
        println!("  ... ({} more)", values.len() - n_show);
    }
}
