//! Forest of boosted trees for binary classification.

use ndarray::ArrayView2;

use super::tree::{Tree, TreeValidationError};

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestValidationError {
    InvalidTree { tree_idx: usize, error: TreeValidationError },
}

/// An additive ensemble of decision trees over one output.
///
/// Predictions are raw margins (log-odds): the base score plus the sum of
/// the reached leaf values. The sigmoid transform lives with the pipeline,
/// not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f32,
}

impl Forest {
    /// Create an empty forest with the given base score (log-odds).
    pub fn new(base_score: f32) -> Self {
        Self { trees: Vec::new(), base_score }
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// The base score (log-odds of the training prior).
    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    /// Iterate over trees.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Raw margin for a sample-major feature row.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.predict_row(features);
        }
        margin
    }

    /// Raw margin for one column of a feature-major matrix.
    pub fn predict_sample(&self, features: ArrayView2<'_, f32>, sample: usize) -> f32 {
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.predict_sample(features.view(), sample);
        }
        margin
    }

    /// Validate every tree in the forest.
    ///
    /// Intended for debug checks and tests.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
        }
        Ok(())
    }
}
