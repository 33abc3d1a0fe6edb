//! Model representation: trees, forests, and boosting configuration.

pub mod config;
pub mod forest;
pub mod tree;

pub use config::{BoostConfig, ConfigError};
pub use forest::{Forest, ForestValidationError};
pub use tree::{ColumnSample, NodeId, SampleAccess, Tree, TreeValidationError};

pub(crate) use tree::TreeBuilder;
