//! Training script: load, clean, split, fit, evaluate, persist.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cardiorisk::data::{load_csv, scrub_invalid_zeros, stratified_split};
use cardiorisk::training::{Accuracy, LogLoss, MetricFn, Verbosity};
use cardiorisk::{persist, BoostConfig, RiskPipeline};

/// Train the cardiac risk classifier and persist the fitted pipeline.
#[derive(Parser, Debug)]
#[command(name = "train", version)]
struct Args {
    /// CSV file with the labeled clinical records
    #[arg(long, default_value = "Data/heart.csv")]
    data: PathBuf,

    /// Where to write the model artifact (overwritten if present)
    #[arg(long, default_value = "Model/model.crsk")]
    out: PathBuf,

    /// Fraction of data held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f32,

    /// Number of boosting rounds
    #[arg(long, default_value_t = 100)]
    n_trees: u32,

    /// Learning rate (shrinkage)
    #[arg(long, default_value_t = 0.1)]
    learning_rate: f32,

    /// Maximum tree depth
    #[arg(long, default_value_t = 5)]
    max_depth: u32,

    /// Row subsampling ratio per tree
    #[arg(long, default_value_t = 1.0)]
    subsample: f32,

    /// Random seed for the split and subsampling
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Thread count: 0 = auto, 1 = sequential
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardiorisk=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    // 1. Load the raw dataset
    let table = load_csv(&args.data)
        .with_context(|| format!("loading dataset from {}", args.data.display()))?;

    // 2. Scrub physiologically impossible sentinel zeros
    let table = scrub_invalid_zeros(table);

    // 3. Stratified train/test split
    let (train, test) = stratified_split(&table, args.test_fraction, args.seed)
        .context("splitting dataset")?;

    // 4. Fit preprocessor + classifier as one pipeline
    let config = BoostConfig::builder()
        .n_trees(args.n_trees)
        .learning_rate(args.learning_rate)
        .max_depth(args.max_depth)
        .subsample(args.subsample)
        .seed(args.seed)
        .verbosity(Verbosity::Info)
        .build()
        .context("invalid hyperparameters")?;

    let pipeline = RiskPipeline::fit(&train, config, Some(&test), args.threads)
        .context("fitting pipeline")?;

    // 5. Holdout evaluation
    let probabilities = pipeline.predict_table(&test).context("evaluating holdout")?;
    let targets: Vec<f32> = test
        .labels()
        .expect("test split retains labels")
        .to_vec();
    info!(
        samples = targets.len(),
        accuracy = Accuracy::default().compute(&probabilities, &targets),
        logloss = LogLoss.compute(&probabilities, &targets),
        "holdout evaluation"
    );

    // 6. Persist the artifact
    persist::save(&pipeline, &args.out)
        .with_context(|| format!("saving artifact to {}", args.out.display()))?;

    println!("model saved to {}", args.out.display());
    Ok(())
}
