//! Binary classification metrics.
//!
//! Metrics consume probabilities (post-sigmoid), not raw margins.

/// A metric computed over predicted probabilities and {0, 1} targets.
pub trait MetricFn {
    /// Compute the metric value.
    fn compute(&self, probabilities: &[f32], targets: &[f32]) -> f64;

    /// Whether larger values indicate a better model.
    fn higher_is_better(&self) -> bool;

    /// Short metric name for logging.
    fn name(&self) -> &'static str;
}

// =============================================================================
// LogLoss (Binary Cross-Entropy)
// =============================================================================

/// Binary cross-entropy: `-mean(y*log(p) + (1-y)*log(1-p))`.
///
/// Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl MetricFn for LogLoss {
    fn compute(&self, probabilities: &[f32], targets: &[f32]) -> f64 {
        debug_assert_eq!(probabilities.len(), targets.len());
        if probabilities.is_empty() {
            return 0.0;
        }

        const EPS: f64 = 1e-15;

        let sum: f64 = probabilities
            .iter()
            .zip(targets.iter())
            .map(|(&p, &y)| {
                let p = (p as f64).clamp(EPS, 1.0 - EPS);
                let y = y as f64;
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum();

        sum / probabilities.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}

// =============================================================================
// Accuracy
// =============================================================================

/// Classification accuracy at a probability threshold.
///
/// Higher is better.
#[derive(Debug, Clone, Copy)]
pub struct Accuracy {
    pub threshold: f32,
}

impl Default for Accuracy {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl MetricFn for Accuracy {
    fn compute(&self, probabilities: &[f32], targets: &[f32]) -> f64 {
        debug_assert_eq!(probabilities.len(), targets.len());
        if probabilities.is_empty() {
            return 0.0;
        }

        let correct = probabilities
            .iter()
            .zip(targets.iter())
            .filter(|(&p, &y)| {
                let predicted = if p >= self.threshold { 1.0 } else { 0.0 };
                (predicted - y).abs() < 0.5
            })
            .count();

        correct as f64 / probabilities.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "accuracy"
    }
}
