//! Process-wide model cache.
//!
//! Inference sessions load the artifact once and reuse it read-only for
//! every subsequent request. [`ModelCache`] is that lazily initialized
//! immutable value, with an explicit [`reset`](ModelCache::reset) hook so
//! tests can force a reload.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::persist::{self, LoadError};
use crate::pipeline::RiskPipeline;

/// Lazily loaded, read-only holder for the served pipeline.
#[derive(Debug, Default)]
pub struct ModelCache {
    slot: RwLock<Option<Arc<RiskPipeline>>>,
}

impl ModelCache {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self { slot: RwLock::new(None) }
    }

    /// Whether a pipeline is currently cached.
    pub fn is_loaded(&self) -> bool {
        self.slot.read().expect("model cache lock poisoned").is_some()
    }

    /// Return the cached pipeline, loading it from the first existing
    /// candidate path on first use.
    ///
    /// Concurrent callers race benignly: at worst the artifact is read
    /// twice and one copy wins.
    pub fn get_or_load(&self, candidates: &[PathBuf]) -> Result<Arc<RiskPipeline>, LoadError> {
        if let Some(pipeline) = self.slot.read().expect("model cache lock poisoned").as_ref() {
            return Ok(Arc::clone(pipeline));
        }

        let path = persist::locate(candidates)?;
        let pipeline = Arc::new(persist::load(&path)?);
        info!(path = %path.display(), trees = pipeline.forest().n_trees(), "model loaded");

        let mut slot = self.slot.write().expect("model cache lock poisoned");
        let cached = slot.get_or_insert_with(|| Arc::clone(&pipeline));
        Ok(Arc::clone(cached))
    }

    /// Drop the cached pipeline so the next call reloads from disk.
    pub fn reset(&self) {
        self.slot.write().expect("model cache lock poisoned").take();
    }
}
