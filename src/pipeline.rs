//! The combined preprocessing + classification pipeline.
//!
//! [`RiskPipeline`] is the unit that gets fitted, persisted, reloaded, and
//! queried: a fitted column transformer in front of a boosted forest, plus
//! the metadata needed to sanity-check an artifact at load time.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::{ClinicalTable, PatientRecord};
use crate::model::{BoostConfig, Forest};
use crate::preprocess::{FittedPreprocessor, PreprocessError, Preprocessor};
use crate::training::{sigmoid, EvalSet, GbdtTrainer, TrainError};
use crate::utils::run_with_threads;

/// Errors produced while fitting a pipeline.
#[derive(Debug)]
pub enum FitError {
    /// The training table has no label column.
    MissingTarget,
    Preprocess(PreprocessError),
    Train(TrainError),
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget => write!(f, "training table has no label column"),
            Self::Preprocess(e) => write!(f, "preprocessing failed: {e}"),
            Self::Train(e) => write!(f, "training failed: {e}"),
        }
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingTarget => None,
            Self::Preprocess(e) => Some(e),
            Self::Train(e) => Some(e),
        }
    }
}

impl From<PreprocessError> for FitError {
    fn from(e: PreprocessError) -> Self {
        Self::Preprocess(e)
    }
}

impl From<TrainError> for FitError {
    fn from(e: TrainError) -> Self {
        Self::Train(e)
    }
}

/// Predicted risk class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Healthy,
    AtRisk,
}

impl RiskLabel {
    /// Class index: 0 = healthy, 1 = at risk.
    #[inline]
    pub fn as_index(&self) -> usize {
        match self {
            Self::Healthy => 0,
            Self::AtRisk => 1,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::AtRisk => write!(f, "at risk"),
        }
    }
}

/// One prediction: a class label plus the per-class probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: RiskLabel,
    /// `[p_healthy, p_risk]`; the two always sum to 1.
    pub probabilities: [f32; 2],
}

impl Prediction {
    /// Probability of the predicted class.
    pub fn confidence(&self) -> f32 {
        self.probabilities[0].max(self.probabilities[1])
    }
}

/// Introspection metadata carried alongside the fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMeta {
    /// Raw input feature names, in schema order.
    pub feature_names: Vec<String>,
    /// Transformed feature names fed to the forest.
    pub model_feature_names: Vec<String>,
    /// Crate version that trained the artifact.
    pub crate_version: String,
}

/// Fitted preprocessor + boosted forest behind one predict surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskPipeline {
    preprocessor: FittedPreprocessor,
    forest: Forest,
    config: BoostConfig,
    meta: PipelineMeta,
}

impl RiskPipeline {
    /// Fit the whole pipeline on a cleaned training table.
    ///
    /// The preprocessor is fitted on `train` only; `eval`, when given, is
    /// transformed with those fitted statistics and used for per-round
    /// validation metrics. `n_threads`: 0 = auto, 1 = sequential.
    pub fn fit(
        train: &ClinicalTable,
        config: BoostConfig,
        eval: Option<&ClinicalTable>,
        n_threads: usize,
    ) -> Result<Self, FitError> {
        let targets = train.labels().ok_or(FitError::MissingTarget)?;
        let targets: Vec<f32> = targets.to_vec();

        let preprocessor = Preprocessor::fit(train)?;
        let features = preprocessor.transform(train)?;

        let eval_data = match eval {
            Some(table) => {
                let eval_targets: Vec<f32> =
                    table.labels().ok_or(FitError::MissingTarget)?.to_vec();
                Some((preprocessor.transform(table)?, eval_targets))
            }
            None => None,
        };

        info!(
            samples = train.n_samples(),
            model_features = preprocessor.n_output_features(),
            trees = config.n_trees,
            "fitting risk pipeline"
        );

        let trainer = GbdtTrainer::new(config.clone());
        let forest = run_with_threads(n_threads, |parallelism| {
            let eval_set = eval_data.as_ref().map(|(features, targets)| EvalSet {
                features: features.view(),
                targets: targets.as_slice(),
            });
            trainer.train(features.view(), &targets, eval_set, parallelism)
        })?;

        let schema = *train.schema();
        let meta = PipelineMeta {
            feature_names: (0..schema.n_features()).map(|i| schema.name(i).to_string()).collect(),
            model_feature_names: preprocessor.output_feature_names(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(Self { preprocessor, forest, config, meta })
    }

    /// Reassemble a pipeline from its persisted parts.
    pub fn from_parts(
        preprocessor: FittedPreprocessor,
        forest: Forest,
        config: BoostConfig,
        meta: PipelineMeta,
    ) -> Self {
        Self { preprocessor, forest, config, meta }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn preprocessor(&self) -> &FittedPreprocessor {
        &self.preprocessor
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn config(&self) -> &BoostConfig {
        &self.config
    }

    pub fn meta(&self) -> &PipelineMeta {
        &self.meta
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Probability vector `[p_healthy, p_risk]` for one record.
    pub fn predict_proba(&self, record: &PatientRecord) -> [f32; 2] {
        let features = self.preprocessor.transform_record(record);
        let margin = self.forest.predict_row(&features);
        let p_risk = sigmoid(margin);
        [1.0 - p_risk, p_risk]
    }

    /// Label plus probabilities for one record, at the 0.5 threshold.
    pub fn predict(&self, record: &PatientRecord) -> Prediction {
        let probabilities = self.predict_proba(record);
        let label = if probabilities[1] >= 0.5 { RiskLabel::AtRisk } else { RiskLabel::Healthy };
        Prediction { label, probabilities }
    }

    /// Risk probabilities for every sample of a table.
    ///
    /// Used for holdout evaluation after training.
    pub fn predict_table(&self, table: &ClinicalTable) -> Result<Vec<f32>, PreprocessError> {
        let features = self.preprocessor.transform(table)?;
        Ok((0..table.n_samples())
            .map(|sample| sigmoid(self.forest.predict_sample(features.view(), sample)))
            .collect())
    }
}
