//! Stratified train/test splitting.

use std::collections::BTreeMap;
use std::fmt;

use rand::prelude::*;
use tracing::debug;

use super::table::ClinicalTable;

/// Errors produced by [`stratified_split`].
#[derive(Debug, Clone, PartialEq)]
pub enum SplitError {
    /// The table has no label column to stratify on.
    MissingTarget,
    /// `test_fraction` outside (0, 1).
    InvalidFraction(f32),
    /// A class has too few samples to appear in both partitions.
    ClassTooSmall { label: i64, count: usize },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget => write!(f, "cannot split: table has no label column"),
            Self::InvalidFraction(v) => {
                write!(f, "test_fraction must be in (0, 1), got {v}")
            }
            Self::ClassTooSmall { label, count } => {
                write!(f, "class {label} has only {count} sample(s), need at least 2")
            }
        }
    }
}

impl std::error::Error for SplitError {}

/// Stratified random split into `(train, test)` partitions.
///
/// Samples are grouped by label, each group is shuffled with a generator
/// seeded from `seed`, and a proportional share of every group goes to the
/// test partition. Both partitions therefore preserve the class balance of
/// the input, and a fixed seed reproduces the same split.
pub fn stratified_split(
    table: &ClinicalTable,
    test_fraction: f32,
    seed: u64,
) -> Result<(ClinicalTable, ClinicalTable), SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }
    let labels = table.labels().ok_or(SplitError::MissingTarget)?;

    // Group sample indices by label. BTreeMap keeps class iteration order
    // stable so the split depends only on the seed.
    let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (sample, &label) in labels.iter().enumerate() {
        by_class.entry(label as i64).or_default().push(sample);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::new();
    let mut test_idx = Vec::new();

    for (label, mut samples) in by_class {
        if samples.len() < 2 {
            return Err(SplitError::ClassTooSmall { label, count: samples.len() });
        }

        samples.shuffle(&mut rng);

        // Proportional share, but every class keeps at least one sample on
        // each side.
        let n_test = ((samples.len() as f32 * test_fraction).round() as usize)
            .clamp(1, samples.len() - 1);

        test_idx.extend_from_slice(&samples[..n_test]);
        train_idx.extend_from_slice(&samples[n_test..]);
    }

    train_idx.sort_unstable();
    test_idx.sort_unstable();

    debug!(
        train = train_idx.len(),
        test = test_idx.len(),
        "stratified split complete"
    );

    Ok((table.select(&train_idx), table.select(&test_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_labels(labels: Vec<f32>) -> ClinicalTable {
        let rows: Vec<[f32; 11]> = (0..labels.len())
            .map(|i| {
                let mut row = [0.0f32; 11];
                row[0] = i as f32; // Age doubles as a sample id
                row
            })
            .collect();
        ClinicalTable::from_rows(&rows, Some(labels))
    }

    fn class_fraction(labels: &[f32]) -> f32 {
        labels.iter().sum::<f32>() / labels.len() as f32
    }

    #[test]
    fn rejects_unlabeled_table() {
        let rows = vec![[0.0f32; 11]; 4];
        let table = ClinicalTable::from_rows(&rows, None);
        assert_eq!(
            stratified_split(&table, 0.2, 42).unwrap_err(),
            SplitError::MissingTarget
        );
    }

    #[test]
    fn rejects_bad_fraction() {
        let table = table_with_labels(vec![0.0, 1.0, 0.0, 1.0]);
        assert!(matches!(
            stratified_split(&table, 0.0, 42),
            Err(SplitError::InvalidFraction(_))
        ));
        assert!(matches!(
            stratified_split(&table, 1.0, 42),
            Err(SplitError::InvalidFraction(_))
        ));
    }

    #[test]
    fn preserves_class_balance() {
        // 100 samples, 40% positive.
        let labels: Vec<f32> = (0..100).map(|i| if i % 5 < 2 { 1.0 } else { 0.0 }).collect();
        let table = table_with_labels(labels.clone());

        let (train, test) = stratified_split(&table, 0.2, 42).unwrap();
        assert_eq!(train.n_samples(), 80);
        assert_eq!(test.n_samples(), 20);

        let overall = class_fraction(&labels);
        let train_frac = class_fraction(&train.labels().unwrap().to_vec());
        let test_frac = class_fraction(&test.labels().unwrap().to_vec());

        assert!((train_frac - overall).abs() < 0.02, "train fraction {train_frac}");
        assert!((test_frac - overall).abs() < 0.02, "test fraction {test_frac}");
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        let labels: Vec<f32> = (0..50).map(|i| (i % 2) as f32).collect();
        let table = table_with_labels(labels);

        let (train, test) = stratified_split(&table, 0.2, 7).unwrap();

        let mut ids: Vec<f32> = train
            .column(0)
            .iter()
            .chain(test.column(0).iter())
            .copied()
            .collect();
        ids.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f32> = (0..50).map(|i| i as f32).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn fixed_seed_reproduces_the_split() {
        let labels: Vec<f32> = (0..60).map(|i| if i % 3 == 0 { 1.0 } else { 0.0 }).collect();
        let table = table_with_labels(labels);

        let (train_a, test_a) = stratified_split(&table, 0.25, 42).unwrap();
        let (train_b, test_b) = stratified_split(&table, 0.25, 42).unwrap();

        assert_eq!(train_a.column(0).to_vec(), train_b.column(0).to_vec());
        assert_eq!(test_a.column(0).to_vec(), test_b.column(0).to_vec());

        let (_, test_c) = stratified_split(&table, 0.25, 43).unwrap();
        assert_ne!(test_a.column(0).to_vec(), test_c.column(0).to_vec());
    }

    #[test]
    fn tiny_class_is_rejected() {
        let table = table_with_labels(vec![0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            stratified_split(&table, 0.25, 42),
            Err(SplitError::ClassTooSmall { label: 1, .. })
        ));
    }
}
