//! Logistic loss for binary classification.

/// Gradient/hessian pair for one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradsTuple {
    pub grad: f32,
    pub hess: f32,
}

/// Numerically-stable sigmoid.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic loss (log loss / binary cross-entropy).
///
/// Expects labels in {0, 1}; margins are log-odds.
/// - Gradient: `sigmoid(margin) - y`
/// - Hessian: `sigmoid(margin) * (1 - sigmoid(margin))`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl LogisticLoss {
    /// Hessian floor keeps leaf weights finite on saturated predictions.
    const HESS_MIN: f32 = 1e-6;

    /// Compute per-sample gradients and hessians into `grad_hess`.
    pub fn compute_gradients(&self, margins: &[f32], targets: &[f32], grad_hess: &mut [GradsTuple]) {
        debug_assert_eq!(margins.len(), targets.len());
        debug_assert_eq!(margins.len(), grad_hess.len());

        for i in 0..margins.len() {
            let p = sigmoid(margins[i]);
            grad_hess[i].grad = p - targets[i];
            grad_hess[i].hess = (p * (1.0 - p)).max(Self::HESS_MIN);
        }
    }

    /// Starting margin: log-odds of the positive-class prior.
    pub fn base_score(&self, targets: &[f32]) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let positive = targets.iter().sum::<f32>() / targets.len() as f32;
        let p = positive.clamp(1e-6, 1.0 - 1e-6);
        (p / (1.0 - p)).ln()
    }
}
