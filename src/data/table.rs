//! In-memory clinical record table.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::schema::ColumnSchema;

/// A loaded batch of clinical records.
///
/// # Storage Layout
///
/// Features are stored **feature-major**: `[n_features, n_samples]`. Each
/// column's values across all samples are contiguous in memory. Missing
/// values are `f32::NAN`; categorical columns hold integer category codes.
///
/// Labels (`HeartDisease`, 0 or 1) are present for training tables only.
#[derive(Debug, Clone)]
pub struct ClinicalTable {
    /// Feature data: `[n_features, n_samples]` (feature-major).
    features: Array2<f32>,

    /// Binary labels, length = n_samples. `None` for unlabeled tables.
    labels: Option<Array1<f32>>,

    schema: ColumnSchema,
}

impl ClinicalTable {
    /// Build a table from sample-major rows in schema column order.
    pub fn from_rows(rows: &[[f32; 11]], labels: Option<Vec<f32>>) -> Self {
        let schema = ColumnSchema;
        let n_samples = rows.len();
        let n_features = schema.n_features();

        let mut features = Array2::zeros((n_features, n_samples));
        for (sample, row) in rows.iter().enumerate() {
            for (feature, &value) in row.iter().enumerate() {
                features[[feature, sample]] = value;
            }
        }

        let labels = labels.map(|l| {
            debug_assert_eq!(l.len(), n_samples, "labels must match sample count");
            Array1::from_vec(l)
        });

        Self { features, labels, schema }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.ncols()
    }

    /// Number of feature columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// The column schema.
    #[inline]
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Feature-major view of all feature data.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// One feature column across all samples.
    #[inline]
    pub fn column(&self, feature: usize) -> ArrayView1<'_, f32> {
        self.features.row(feature)
    }

    /// One feature column, looked up by name.
    pub fn column_by_name(&self, name: &str) -> Option<ArrayView1<'_, f32>> {
        self.schema.feature_index(name).map(|i| self.column(i))
    }

    /// Labels, if this table carries them.
    #[inline]
    pub fn labels(&self) -> Option<ArrayView1<'_, f32>> {
        self.labels.as_ref().map(|l| l.view())
    }

    /// Whether this table carries labels.
    #[inline]
    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    /// Overwrite a single cell. Used by the cleaner.
    #[inline]
    pub(crate) fn set(&mut self, feature: usize, sample: usize, value: f32) {
        self.features[[feature, sample]] = value;
    }

    /// New table containing only the given samples, in the given order.
    ///
    /// Labels are carried along when present.
    pub fn select(&self, samples: &[usize]) -> Self {
        let n_features = self.n_features();
        let mut features = Array2::zeros((n_features, samples.len()));
        for (out, &sample) in samples.iter().enumerate() {
            for feature in 0..n_features {
                features[[feature, out]] = self.features[[feature, sample]];
            }
        }

        let labels = self
            .labels
            .as_ref()
            .map(|l| samples.iter().map(|&s| l[s]).collect::<Array1<f32>>());

        Self { features, labels, schema: self.schema }
    }
}
