//! cardiorisk: cardiac disease risk prediction from tabular clinical features.
//!
//! The crate covers the full path from raw clinical records to a served
//! prediction:
//!
//! - [`data`] - CSV loading, sentinel-value cleaning, stratified splitting
//! - [`preprocess`] - column-wise imputation, scaling, and one-hot encoding
//! - [`training`] - gradient boosted tree training with a logistic objective
//! - [`pipeline`] - the combined preprocessor + classifier ([`RiskPipeline`])
//! - [`persist`] - the versioned on-disk artifact format
//! - [`inference`] - the process-wide read-only model cache
//!
//! # Training
//!
//! ```ignore
//! use cardiorisk::{BoostConfig, RiskPipeline};
//! use cardiorisk::data::{load_csv, scrub_invalid_zeros, stratified_split};
//!
//! let table = scrub_invalid_zeros(load_csv("Data/heart.csv")?);
//! let (train, test) = stratified_split(&table, 0.2, 42)?;
//! let config = BoostConfig::builder().build()?;
//! let pipeline = RiskPipeline::fit(&train, config, Some(&test), 0)?;
//! cardiorisk::persist::save(&pipeline, "Model/model.crsk".as_ref())?;
//! ```
//!
//! # Inference
//!
//! Load the persisted artifact once, then call
//! [`RiskPipeline::predict`] per record.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod inference;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod preprocess;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Data handling
pub use data::{
    ClinicalTable, ColumnSchema, DataError, FeatureKind, PatientRecord, SplitError,
};

// Preprocessing
pub use preprocess::{FittedPreprocessor, PreprocessError, Preprocessor};

// Model and training types
pub use model::{BoostConfig, ConfigError, Forest, Tree};
pub use training::{GbdtTrainer, TrainError, Verbosity};

// The combined pipeline and its serving cache
pub use inference::ModelCache;
pub use pipeline::{Prediction, RiskLabel, RiskPipeline};

// Persistence
pub use persist::{LoadError, SaveError};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
