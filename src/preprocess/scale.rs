//! Zero-mean / unit-variance scaling for numeric columns.

use serde::{Deserialize, Serialize};

/// Standard scaler fitted on an already-imputed column.
///
/// Uses the population standard deviation. A constant column scales by 1,
/// so it maps to all zeros instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: f32,
    std: f32,
}

impl StandardScaler {
    /// Fit on a column of finite values.
    pub fn fit(values: &[f32]) -> Self {
        let n = values.len().max(1) as f32;
        let mean = values.iter().sum::<f32>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
        let std = var.sqrt();
        let std = if std > 0.0 && std.is_finite() { std } else { 1.0 };
        Self { mean, std }
    }

    #[inline]
    pub fn mean(&self) -> f32 {
        self.mean
    }

    #[inline]
    pub fn std(&self) -> f32 {
        self.std
    }

    /// Scale a single value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        (value - self.mean) / self.std
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centers_and_scales() {
        let scaler = StandardScaler::fit(&[2.0, 4.0, 6.0, 8.0]);
        assert_relative_eq!(scaler.mean(), 5.0);
        // Population std of [2,4,6,8] is sqrt(5)
        assert_relative_eq!(scaler.std(), 5.0f32.sqrt(), epsilon = 1e-6);

        let scaled: Vec<f32> = [2.0, 4.0, 6.0, 8.0].iter().map(|&v| scaler.apply(v)).collect();
        let mean: f32 = scaled.iter().sum::<f32>() / 4.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn constant_column_scales_by_one() {
        let scaler = StandardScaler::fit(&[3.0, 3.0, 3.0]);
        assert_eq!(scaler.std(), 1.0);
        assert_eq!(scaler.apply(3.0), 0.0);
        assert_eq!(scaler.apply(4.0), 1.0);
    }
}
