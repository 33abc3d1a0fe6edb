//! Missing-value imputers.
//!
//! Both imputers learn a single fill value from training data and apply it
//! to missing cells (`NaN`) thereafter. Fitting on training data only is
//! what keeps test/inference data from leaking into the fill statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Median imputer for numeric columns.
///
/// The median is computed over the non-missing values; for an even count
/// it is the midpoint of the two middle values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    fill: f32,
}

impl MedianImputer {
    /// Fit on a column. Returns `None` if every value is missing.
    pub fn fit(values: impl Iterator<Item = f32>) -> Option<Self> {
        let mut present: Vec<f32> = values.filter(|v| !v.is_nan()).collect();
        if present.is_empty() {
            return None;
        }

        present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = present.len();
        let fill = if n % 2 == 1 {
            present[n / 2]
        } else {
            0.5 * (present[n / 2 - 1] + present[n / 2])
        };

        Some(Self { fill })
    }

    /// The learned fill value.
    #[inline]
    pub fn fill(&self) -> f32 {
        self.fill
    }

    /// Fill a single value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.fill
        } else {
            value
        }
    }
}

/// Most-frequent imputer for categorical columns (integer category codes).
///
/// Ties break toward the smallest code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MostFrequentImputer {
    fill: u32,
}

impl MostFrequentImputer {
    /// Fit on a column of category codes. Returns `None` if every value is
    /// missing.
    pub fn fit(values: impl Iterator<Item = f32>) -> Option<Self> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for value in values.filter(|v| !v.is_nan()) {
            *counts.entry(value as u32).or_default() += 1;
        }

        // Key-ordered iteration plus strict comparison ties toward the
        // smallest code.
        let mut best: Option<(u32, usize)> = None;
        for (code, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((code, count));
            }
        }

        best.map(|(fill, _)| Self { fill })
    }

    /// The learned fill code.
    #[inline]
    pub fn fill(&self) -> u32 {
        self.fill
    }

    /// Fill a single code value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.fill as f32
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_count() {
        let imputer = MedianImputer::fit([3.0, 1.0, 2.0].into_iter()).unwrap();
        assert_eq!(imputer.fill(), 2.0);
    }

    #[test]
    fn median_even_count_is_midpoint() {
        let imputer = MedianImputer::fit([1.0, 2.0, 3.0, 10.0].into_iter()).unwrap();
        assert_eq!(imputer.fill(), 2.5);
    }

    #[test]
    fn median_ignores_missing() {
        let imputer =
            MedianImputer::fit([f32::NAN, 5.0, f32::NAN, 7.0, 9.0].into_iter()).unwrap();
        assert_eq!(imputer.fill(), 7.0);
    }

    #[test]
    fn median_all_missing_fails() {
        assert!(MedianImputer::fit([f32::NAN, f32::NAN].into_iter()).is_none());
    }

    #[test]
    fn median_apply_only_touches_missing() {
        let imputer = MedianImputer::fit([1.0, 2.0, 3.0].into_iter()).unwrap();
        assert_eq!(imputer.apply(f32::NAN), 2.0);
        assert_eq!(imputer.apply(5.5), 5.5);
    }

    #[test]
    fn most_frequent_picks_the_mode() {
        let imputer =
            MostFrequentImputer::fit([2.0, 0.0, 2.0, 1.0, 2.0].into_iter()).unwrap();
        assert_eq!(imputer.fill(), 2);
    }

    #[test]
    fn most_frequent_tie_breaks_to_smallest_code() {
        let imputer = MostFrequentImputer::fit([1.0, 0.0, 1.0, 0.0].into_iter()).unwrap();
        assert_eq!(imputer.fill(), 0);
    }

    #[test]
    fn most_frequent_ignores_missing() {
        let imputer = MostFrequentImputer::fit([f32::NAN, 3.0, 3.0, 1.0].into_iter()).unwrap();
        assert_eq!(imputer.fill(), 3);
        assert_eq!(imputer.apply(f32::NAN), 3.0);
        assert_eq!(imputer.apply(1.0), 1.0);
    }
}
