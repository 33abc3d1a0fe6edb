//! Gradient boosted tree trainer.
//!
//! Orchestrates objective computation, tree growing, and prediction
//! updates. Trees grow depth-wise with exact greedy split finding: the
//! preprocessed feature matrix is small and dense, so every distinct value
//! boundary is a candidate threshold and no histogram binning is needed.
//!
//! The trainer expects imputed input - the preprocessing stage guarantees
//! there are no missing values by the time boosting starts.

use ndarray::ArrayView2;
use rand::prelude::*;
use tracing::info;

use crate::model::{BoostConfig, Forest, Tree};
use crate::model::TreeBuilder;
use crate::utils::Parallelism;

use super::metrics::{Accuracy, LogLoss, MetricFn};
use super::objective::{sigmoid, GradsTuple, LogisticLoss};
use super::Verbosity;

/// Errors produced by [`GbdtTrainer::train`].
#[derive(Debug, Clone, PartialEq)]
pub enum TrainError {
    /// No samples to train on.
    EmptyDataset,
    /// Target length does not match the sample count.
    TargetLength { expected: usize, got: usize },
    /// A target value outside {0, 1}.
    NonBinaryTarget { sample: usize, value: f32 },
}

impl std::fmt::Display for TrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataset => write!(f, "cannot train on an empty dataset"),
            Self::TargetLength { expected, got } => {
                write!(f, "expected {expected} targets, got {got}")
            }
            Self::NonBinaryTarget { sample, value } => {
                write!(f, "target for sample {sample} is {value}, expected 0 or 1")
            }
        }
    }
}

impl std::error::Error for TrainError {}

/// A validation set evaluated during training.
#[derive(Clone)]
pub struct EvalSet<'a> {
    /// Feature-major matrix `[n_features, n_samples]`.
    pub features: ArrayView2<'a, f32>,
    /// Binary targets, length = n_samples.
    pub targets: &'a [f32],
}

/// Trainer for a binary-classification tree ensemble.
pub struct GbdtTrainer {
    config: BoostConfig,
}

impl GbdtTrainer {
    pub fn new(config: BoostConfig) -> Self {
        Self { config }
    }

    /// Train a forest on a feature-major matrix `[n_features, n_samples]`.
    ///
    /// When `eval` is given and verbosity allows, validation logloss and
    /// accuracy are logged every 10 rounds.
    pub fn train(
        &self,
        features: ArrayView2<'_, f32>,
        targets: &[f32],
        eval: Option<EvalSet<'_>>,
        parallelism: Parallelism,
    ) -> Result<Forest, TrainError> {
        let n_samples = features.ncols();
        if n_samples == 0 {
            return Err(TrainError::EmptyDataset);
        }
        if targets.len() != n_samples {
            return Err(TrainError::TargetLength { expected: n_samples, got: targets.len() });
        }
        for (sample, &value) in targets.iter().enumerate() {
            if value != 0.0 && value != 1.0 {
                return Err(TrainError::NonBinaryTarget { sample, value });
            }
        }

        let objective = LogisticLoss;
        let base_score = objective.base_score(targets);
        let mut forest = Forest::new(base_score);

        let mut margins = vec![base_score; n_samples];
        let mut eval_margins = eval.as_ref().map(|e| vec![base_score; e.targets.len()]);
        let mut grad_hess = vec![GradsTuple::default(); n_samples];
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let grower = TreeGrower { features: features.view(), config: &self.config, parallelism };

        for round in 0..self.config.n_trees {
            objective.compute_gradients(&margins, targets, &mut grad_hess);

            let rows = self.sample_rows(n_samples, &mut rng);
            let tree = grower.grow(&grad_hess, rows);

            for sample in 0..n_samples {
                margins[sample] += tree.predict_sample(features.view(), sample);
            }
            if let (Some(eval), Some(eval_margins)) = (eval.as_ref(), eval_margins.as_mut()) {
                for sample in 0..eval.targets.len() {
                    eval_margins[sample] += tree.predict_sample(eval.features.view(), sample);
                }
            }

            forest.push_tree(tree);

            if self.config.verbosity == Verbosity::Info {
                let last = round + 1 == self.config.n_trees;
                if (round + 1) % 10 == 0 || last {
                    if let (Some(eval), Some(eval_margins)) = (eval.as_ref(), eval_margins.as_ref())
                    {
                        log_eval(round + 1, eval_margins, eval.targets);
                    }
                }
            }
        }

        Ok(forest)
    }

    /// Pick this round's training rows.
    ///
    /// With `subsample < 1`, each row is kept independently with that
    /// probability (falling back to the full set if the draw comes up
    /// empty).
    fn sample_rows(&self, n_samples: usize, rng: &mut StdRng) -> Vec<u32> {
        if self.config.subsample >= 1.0 {
            return (0..n_samples as u32).collect();
        }

        let rows: Vec<u32> = (0..n_samples as u32)
            .filter(|_| rng.gen::<f32>() < self.config.subsample)
            .collect();

        if rows.is_empty() {
            (0..n_samples as u32).collect()
        } else {
            rows
        }
    }
}

fn log_eval(round: u32, eval_margins: &[f32], targets: &[f32]) {
    let probabilities: Vec<f32> = eval_margins.iter().map(|&m| sigmoid(m)).collect();
    let logloss = LogLoss.compute(&probabilities, targets);
    let accuracy = Accuracy::default().compute(&probabilities, targets);
    info!(round, logloss, accuracy, "validation metrics");
}

// =============================================================================
// Tree growing
// =============================================================================

/// Best split found for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SplitCandidate {
    feature: u32,
    threshold: f32,
    gain: f32,
}

struct TreeGrower<'a> {
    features: ArrayView2<'a, f32>,
    config: &'a BoostConfig,
    parallelism: Parallelism,
}

impl TreeGrower<'_> {
    /// Grow one tree over the sampled rows.
    fn grow(&self, grad_hess: &[GradsTuple], rows: Vec<u32>) -> Tree {
        let mut builder = TreeBuilder::new();
        self.grow_node(&mut builder, grad_hess, rows, 0);
        builder.freeze()
    }

    fn grow_node(
        &self,
        builder: &mut TreeBuilder,
        grad_hess: &[GradsTuple],
        rows: Vec<u32>,
        depth: u32,
    ) -> u32 {
        let (g_sum, h_sum) = sums(grad_hess, &rows);

        if depth >= self.config.max_depth || rows.len() < 2 {
            return builder.push_leaf(self.leaf_weight(g_sum, h_sum));
        }

        let best = match self.find_best_split(grad_hess, &rows, g_sum, h_sum) {
            Some(best) if best.gain > self.config.min_split_gain => best,
            _ => return builder.push_leaf(self.leaf_weight(g_sum, h_sum)),
        };

        let (left_rows, right_rows) = self.partition(&rows, best);
        debug_assert!(!left_rows.is_empty() && !right_rows.is_empty());

        let node = builder.push_split(best.feature, best.threshold, true);
        let left = self.grow_node(builder, grad_hess, left_rows, depth + 1);
        let right = self.grow_node(builder, grad_hess, right_rows, depth + 1);
        builder.set_children(node, left, right);
        node
    }

    /// Optimal leaf weight with shrinkage applied.
    #[inline]
    fn leaf_weight(&self, g_sum: f32, h_sum: f32) -> f32 {
        -g_sum / (h_sum + self.config.lambda) * self.config.learning_rate
    }

    /// Exact greedy search over every feature, parallel when allowed.
    ///
    /// `maybe_par_map` preserves input order, and the sequential argmax
    /// below breaks ties toward the lower feature index, so the chosen
    /// split does not depend on the thread count.
    fn find_best_split(
        &self,
        grad_hess: &[GradsTuple],
        rows: &[u32],
        g_sum: f32,
        h_sum: f32,
    ) -> Option<SplitCandidate> {
        let n_features = self.features.nrows();
        let candidates = self.parallelism.maybe_par_map(0..n_features, |feature| {
            self.best_split_for_feature(feature, grad_hess, rows, g_sum, h_sum)
        });

        let mut best: Option<SplitCandidate> = None;
        for candidate in candidates.into_iter().flatten() {
            if best.map_or(true, |b| candidate.gain > b.gain) {
                best = Some(candidate);
            }
        }
        best
    }

    fn best_split_for_feature(
        &self,
        feature: usize,
        grad_hess: &[GradsTuple],
        rows: &[u32],
        g_sum: f32,
        h_sum: f32,
    ) -> Option<SplitCandidate> {
        let lambda = self.config.lambda;
        let min_child_weight = self.config.min_child_weight;

        let mut sorted: Vec<(f32, f32, f32)> = rows
            .iter()
            .map(|&row| {
                let gh = grad_hess[row as usize];
                (self.features[[feature, row as usize]], gh.grad, gh.hess)
            })
            .collect();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let parent_score = g_sum * g_sum / (h_sum + lambda);

        let mut best: Option<SplitCandidate> = None;
        let mut g_left = 0.0f32;
        let mut h_left = 0.0f32;

        for i in 0..sorted.len() - 1 {
            let (value, grad, hess) = sorted[i];
            g_left += grad;
            h_left += hess;

            let next_value = sorted[i + 1].0;
            if !(value < next_value) {
                continue;
            }

            let h_right = h_sum - h_left;
            if h_left < min_child_weight || h_right < min_child_weight {
                continue;
            }

            let g_right = g_sum - g_left;
            let gain = 0.5
                * (g_left * g_left / (h_left + lambda) + g_right * g_right / (h_right + lambda)
                    - parent_score);

            if best.map_or(true, |b| gain > b.gain) {
                // Midpoint threshold; nudged up to the next value when
                // rounding would land on the left side.
                let mut threshold = 0.5 * (value + next_value);
                if !(threshold > value) {
                    threshold = next_value;
                }
                best = Some(SplitCandidate { feature: feature as u32, threshold, gain });
            }
        }

        best
    }

    fn partition(&self, rows: &[u32], split: SplitCandidate) -> (Vec<u32>, Vec<u32>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for &row in rows {
            let value = self.features[[split.feature as usize, row as usize]];
            if value < split.threshold {
                left.push(row);
            } else {
                right.push(row);
            }
        }
        (left, right)
    }
}

#[inline]
fn sums(grad_hess: &[GradsTuple], rows: &[u32]) -> (f32, f32) {
    let mut g = 0.0f32;
    let mut h = 0.0f32;
    for &row in rows {
        let gh = grad_hess[row as usize];
        g += gh.grad;
        h += gh.hess;
    }
    (g, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Single feature that separates the classes at 0.5.
    fn separable_data(n: usize) -> (Array2<f32>, Vec<f32>) {
        let values: Vec<f32> = (0..n).map(|i| i as f32 / n as f32).collect();
        let targets: Vec<f32> = values.iter().map(|&v| if v < 0.5 { 0.0 } else { 1.0 }).collect();
        let features = Array2::from_shape_vec((1, n), values).unwrap();
        (features, targets)
    }

    fn small_config(n_trees: u32) -> BoostConfig {
        BoostConfig::builder()
            .n_trees(n_trees)
            .max_depth(3)
            .min_child_weight(0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn rejects_empty_dataset() {
        let features = Array2::<f32>::zeros((2, 0));
        let trainer = GbdtTrainer::new(small_config(5));
        assert_eq!(
            trainer.train(features.view(), &[], None, Parallelism::Sequential),
            Err(TrainError::EmptyDataset)
        );
    }

    #[test]
    fn rejects_target_length_mismatch() {
        let features = Array2::<f32>::zeros((2, 3));
        let trainer = GbdtTrainer::new(small_config(5));
        assert_eq!(
            trainer.train(features.view(), &[1.0], None, Parallelism::Sequential),
            Err(TrainError::TargetLength { expected: 3, got: 1 })
        );
    }

    #[test]
    fn rejects_non_binary_targets() {
        let features = Array2::<f32>::zeros((1, 2));
        let trainer = GbdtTrainer::new(small_config(5));
        assert_eq!(
            trainer.train(features.view(), &[0.0, 2.0], None, Parallelism::Sequential),
            Err(TrainError::NonBinaryTarget { sample: 1, value: 2.0 })
        );
    }

    #[test]
    fn separates_a_simple_boundary() {
        let (features, targets) = separable_data(40);
        let trainer = GbdtTrainer::new(small_config(20));
        let forest = trainer
            .train(features.view(), &targets, None, Parallelism::Sequential)
            .unwrap();
        forest.validate().expect("forest should be valid");

        let p_low = sigmoid(forest.predict_row(&[0.1]));
        let p_high = sigmoid(forest.predict_row(&[0.9]));
        assert!(p_low < 0.2, "got {p_low}");
        assert!(p_high > 0.8, "got {p_high}");
    }

    #[test]
    fn training_is_deterministic_across_parallelism() {
        let (features, targets) = separable_data(60);
        let config = BoostConfig::builder()
            .n_trees(10)
            .max_depth(3)
            .subsample(0.8)
            .min_child_weight(0.0)
            .build()
            .unwrap();

        let sequential = GbdtTrainer::new(config.clone())
            .train(features.view(), &targets, None, Parallelism::Sequential)
            .unwrap();
        let parallel = GbdtTrainer::new(config)
            .train(features.view(), &targets, None, Parallelism::Parallel)
            .unwrap();

        for probe in [0.05f32, 0.3, 0.55, 0.95] {
            assert_eq!(sequential.predict_row(&[probe]), parallel.predict_row(&[probe]));
        }
    }

    #[test]
    fn more_trees_reduce_training_loss() {
        let (features, targets) = separable_data(50);

        let loss_for = |n_trees: u32| {
            let forest = GbdtTrainer::new(small_config(n_trees))
                .train(features.view(), &targets, None, Parallelism::Sequential)
                .unwrap();
            let probabilities: Vec<f32> = (0..50)
                .map(|i| sigmoid(forest.predict_sample(features.view(), i)))
                .collect();
            LogLoss.compute(&probabilities, &targets)
        };

        assert!(loss_for(20) < loss_for(2));
    }

    #[test]
    fn depth_limit_bounds_tree_size() {
        let (features, targets) = separable_data(64);
        let config = BoostConfig::builder()
            .n_trees(1)
            .max_depth(2)
            .min_child_weight(0.0)
            .build()
            .unwrap();
        let forest = GbdtTrainer::new(config)
            .train(features.view(), &targets, None, Parallelism::Sequential)
            .unwrap();

        // Depth 2 allows at most 7 nodes.
        let tree = forest.trees().next().unwrap();
        assert!(tree.n_nodes() <= 7, "got {} nodes", tree.n_nodes());
    }

    #[test]
    fn constant_feature_yields_single_leaf() {
        let features = Array2::from_elem((1, 10), 3.0);
        let targets: Vec<f32> = (0..10).map(|i| (i % 2) as f32).collect();
        let forest = GbdtTrainer::new(small_config(1))
            .train(features.view(), &targets, None, Parallelism::Sequential)
            .unwrap();

        assert_eq!(forest.trees().next().unwrap().n_nodes(), 1);
    }
}
