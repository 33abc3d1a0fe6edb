//! One-hot encoding for categorical columns.

use serde::{Deserialize, Serialize};

/// One-hot encoder over the category codes observed at fit time.
///
/// A code that was never seen during fitting encodes to an all-zero
/// indicator block rather than failing, so inference tolerates categories
/// the training data did not contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Observed category codes, sorted ascending.
    categories: Vec<u32>,
}

impl OneHotEncoder {
    /// Fit on a column of category codes (missing values ignored).
    pub fn fit(values: impl Iterator<Item = f32>) -> Self {
        let mut categories: Vec<u32> =
            values.filter(|v| !v.is_nan()).map(|v| v as u32).collect();
        categories.sort_unstable();
        categories.dedup();
        Self { categories }
    }

    /// Number of indicator outputs this encoder produces.
    #[inline]
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// The observed category codes, sorted ascending.
    #[inline]
    pub fn categories(&self) -> &[u32] {
        &self.categories
    }

    /// Encode one code into `out` (length must equal [`width`](Self::width)).
    ///
    /// Unknown codes leave the block all zero.
    pub fn encode_into(&self, value: f32, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.width());
        out.fill(0.0);
        if value.is_nan() {
            return;
        }
        let code = value as u32;
        if let Ok(pos) = self.categories.binary_search(&code) {
            out[pos] = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learns_sorted_distinct_categories() {
        let encoder = OneHotEncoder::fit([2.0, 0.0, 2.0, 1.0, 0.0].into_iter());
        assert_eq!(encoder.categories(), &[0, 1, 2]);
        assert_eq!(encoder.width(), 3);
    }

    #[test]
    fn encodes_known_code() {
        let encoder = OneHotEncoder::fit([0.0, 1.0, 2.0].into_iter());
        let mut out = vec![9.0; 3];
        encoder.encode_into(1.0, &mut out);
        assert_eq!(out, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn unknown_code_encodes_to_zeros() {
        let encoder = OneHotEncoder::fit([0.0, 1.0].into_iter());
        let mut out = vec![9.0; 2];
        encoder.encode_into(5.0, &mut out);
        assert_eq!(out, vec![0.0, 0.0]);
    }

    #[test]
    fn unseen_category_gap_is_preserved() {
        // Fit saw only codes 0 and 3; code 1 is unknown.
        let encoder = OneHotEncoder::fit([3.0, 0.0, 3.0].into_iter());
        assert_eq!(encoder.categories(), &[0, 3]);

        let mut out = vec![0.0; 2];
        encoder.encode_into(3.0, &mut out);
        assert_eq!(out, vec![0.0, 1.0]);

        encoder.encode_into(1.0, &mut out);
        assert_eq!(out, vec![0.0, 0.0]);
    }
}
