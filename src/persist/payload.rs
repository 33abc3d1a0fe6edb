//! Payload structures for the native artifact format.
//!
//! These structs are designed for serialization with Postcard. They mirror
//! the runtime types as parallel arrays for compact binary storage.

use serde::{Deserialize, Serialize};

use crate::model::{Forest, Tree};
use crate::pipeline::PipelineMeta;
use crate::preprocess::FittedPreprocessor;
use crate::BoostConfig;

/// Version-tagged payload enum for forward compatibility.
///
/// New format versions add new variants rather than modifying existing
/// ones, so older readers detect unsupported content by the discriminant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    /// Version 1 payload format.
    V1(PayloadV1),
}

/// Version 1 payload structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadV1 {
    /// Pipeline metadata (feature names, crate version).
    pub meta: PipelineMeta,
    /// Training configuration the artifact was produced with.
    pub config: BoostConfig,
    /// Fitted preprocessing statistics.
    pub preprocessor: FittedPreprocessor,
    /// The trained forest.
    pub forest: ForestPayload,
}

/// Forest of decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestPayload {
    /// Base score (log-odds of the training prior).
    pub base_score: f32,
    /// Individual tree payloads.
    pub trees: Vec<TreePayload>,
}

/// Single decision tree as parallel arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreePayload {
    /// Number of nodes.
    pub num_nodes: u32,
    /// Split feature indices (one per node, 0 for leaves).
    pub split_features: Vec<u32>,
    /// Split thresholds (one per node, 0.0 for leaves).
    pub thresholds: Vec<f32>,
    /// Left child indices (one per node, 0 for leaves).
    pub left_children: Vec<u32>,
    /// Right child indices (one per node, 0 for leaves).
    pub right_children: Vec<u32>,
    /// Default direction for missing values (one per node).
    pub default_left: Vec<bool>,
    /// Whether each node is a leaf.
    pub is_leaf: Vec<bool>,
    /// Leaf values (one per node, 0.0 for internal nodes).
    pub leaf_values: Vec<f32>,
}

/// A payload whose parallel arrays disagree with `num_nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPayload {
    pub tree_idx: usize,
    pub field: &'static str,
}

impl std::fmt::Display for MalformedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tree {} field {} has the wrong length", self.tree_idx, self.field)
    }
}

impl std::error::Error for MalformedPayload {}

// =============================================================================
// Conversions
// =============================================================================

impl From<&Tree> for TreePayload {
    fn from(tree: &Tree) -> Self {
        let n = tree.n_nodes();
        let ids = 0..n as u32;
        Self {
            num_nodes: n as u32,
            split_features: ids.clone().map(|i| tree.split_index(i)).collect(),
            thresholds: ids.clone().map(|i| tree.split_threshold(i)).collect(),
            left_children: ids.clone().map(|i| tree.left_child(i)).collect(),
            right_children: ids.clone().map(|i| tree.right_child(i)).collect(),
            default_left: ids.clone().map(|i| tree.default_left(i)).collect(),
            is_leaf: ids.clone().map(|i| tree.is_leaf(i)).collect(),
            leaf_values: ids.map(|i| tree.leaf_value(i)).collect(),
        }
    }
}

impl From<&Forest> for ForestPayload {
    fn from(forest: &Forest) -> Self {
        Self {
            base_score: forest.base_score(),
            trees: forest.trees().map(TreePayload::from).collect(),
        }
    }
}

impl TreePayload {
    fn check_len(&self, tree_idx: usize, field: &'static str, len: usize) -> Result<(), MalformedPayload> {
        if len == self.num_nodes as usize {
            Ok(())
        } else {
            Err(MalformedPayload { tree_idx, field })
        }
    }

    /// Rebuild the runtime tree, verifying array lengths first.
    pub fn into_tree(self, tree_idx: usize) -> Result<Tree, MalformedPayload> {
        self.check_len(tree_idx, "split_features", self.split_features.len())?;
        self.check_len(tree_idx, "thresholds", self.thresholds.len())?;
        self.check_len(tree_idx, "left_children", self.left_children.len())?;
        self.check_len(tree_idx, "right_children", self.right_children.len())?;
        self.check_len(tree_idx, "default_left", self.default_left.len())?;
        self.check_len(tree_idx, "is_leaf", self.is_leaf.len())?;
        self.check_len(tree_idx, "leaf_values", self.leaf_values.len())?;

        Ok(Tree::new(
            self.split_features,
            self.thresholds,
            self.left_children,
            self.right_children,
            self.default_left,
            self.is_leaf,
            self.leaf_values,
        ))
    }
}

impl ForestPayload {
    /// Rebuild the runtime forest, verifying every tree payload.
    pub fn into_forest(self) -> Result<Forest, MalformedPayload> {
        let mut forest = Forest::new(self.base_score);
        for (tree_idx, tree) in self.trees.into_iter().enumerate() {
            forest.push_tree(tree.into_tree(tree_idx)?);
        }
        Ok(forest)
    }
}
