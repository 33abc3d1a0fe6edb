//! Training infrastructure for the boosted classifier.
//!
//! - [`GbdtTrainer`]: boosting rounds, tree growing, margin updates
//! - [`LogisticLoss`]: gradient/hessian computation for binary targets
//! - [`LogLoss`], [`Accuracy`]: evaluation metrics
//! - [`Verbosity`]: per-round eval logging control

mod metrics;
mod objective;
mod trainer;

pub use metrics::{Accuracy, LogLoss, MetricFn};
pub use objective::{sigmoid, GradsTuple, LogisticLoss};
pub use trainer::{EvalSet, GbdtTrainer, TrainError};

use serde::{Deserialize, Serialize};

/// How much the trainer logs while fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// No per-round output.
    #[default]
    Silent,
    /// Validation metrics every 10 rounds.
    Info,
}
