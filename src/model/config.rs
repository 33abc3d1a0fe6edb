//! Boosting configuration with builder pattern.
//!
//! [`BoostConfig`] collects the classifier hyperparameters behind a `bon`
//! builder with validation at build time. Defaults match the production
//! training script: 100 trees, learning rate 0.1, depth 5, seed 42.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::training::Verbosity;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Learning rate must be positive.
    InvalidLearningRate(f32),
    /// Number of trees must be at least 1.
    InvalidNTrees,
    /// Tree depth must be at least 1.
    InvalidMaxDepth,
    /// Subsample ratio must be in (0, 1].
    InvalidSubsample(f32),
    /// Regularization parameter must be non-negative.
    InvalidRegularization { field: &'static str, value: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLearningRate(v) => {
                write!(f, "learning_rate must be positive, got {v}")
            }
            Self::InvalidNTrees => write!(f, "n_trees must be at least 1"),
            Self::InvalidMaxDepth => write!(f, "max_depth must be at least 1"),
            Self::InvalidSubsample(v) => write!(f, "subsample must be in (0, 1], got {v}"),
            Self::InvalidRegularization { field, value } => {
                write!(f, "{field} must be non-negative, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// BoostConfig
// =============================================================================

/// Hyperparameters for the boosted classifier.
///
/// # Example
///
/// ```
/// use cardiorisk::BoostConfig;
///
/// // Production defaults
/// let config = BoostConfig::builder().build().unwrap();
/// assert_eq!(config.n_trees, 100);
///
/// // Smaller, subsampled model
/// let config = BoostConfig::builder()
///     .n_trees(50)
///     .max_depth(3)
///     .subsample(0.8)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct BoostConfig {
    /// Number of boosting rounds (trees to train). Default: 100.
    #[builder(default = 100)]
    pub n_trees: u32,

    /// Learning rate (shrinkage) applied to leaf weights. Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f32,

    /// Maximum tree depth. Default: 5.
    #[builder(default = 5)]
    pub max_depth: u32,

    /// Row subsampling ratio per tree. Default: 1.0 (no subsampling).
    #[builder(default = 1.0)]
    pub subsample: f32,

    /// L2 regularization on leaf weights. Default: 1.0.
    #[builder(default = 1.0)]
    pub lambda: f32,

    /// Minimum hessian sum required in a child. Default: 1.0.
    #[builder(default = 1.0)]
    pub min_child_weight: f32,

    /// Minimum gain required to keep a split. Default: 0.0.
    #[builder(default = 0.0)]
    pub min_split_gain: f32,

    /// Random seed for subsampling. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Verbosity of per-round evaluation logging. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: boost_config_builder::IsComplete> BoostConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - `learning_rate <= 0`
    /// - `n_trees == 0` or `max_depth == 0`
    /// - `subsample` outside (0, 1]
    /// - Negative regularization parameters
    pub fn build(self) -> Result<BoostConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl BoostConfig {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.learning_rate <= 0.0 {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ConfigError::InvalidSubsample(self.subsample));
        }
        if self.lambda < 0.0 {
            return Err(ConfigError::InvalidRegularization {
                field: "lambda",
                value: self.lambda,
            });
        }
        if self.min_child_weight < 0.0 {
            return Err(ConfigError::InvalidRegularization {
                field: "min_child_weight",
                value: self.min_child_weight,
            });
        }
        if self.min_split_gain < 0.0 {
            return Err(ConfigError::InvalidRegularization {
                field: "min_split_gain",
                value: self.min_split_gain,
            });
        }
        Ok(())
    }
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}
