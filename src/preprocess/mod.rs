//! Column-wise preprocessing transformer.
//!
//! Mirrors the two-branch column transformer the training data demands:
//! numeric columns go through median imputation then standardization,
//! categorical columns through most-frequent imputation then one-hot
//! encoding with unknown-category tolerance.
//!
//! [`Preprocessor::fit`] learns all statistics from training data only;
//! the resulting [`FittedPreprocessor`] is immutable and its `transform`
//! methods are deterministic.

mod encode;
mod impute;
mod scale;

pub use encode::OneHotEncoder;
pub use impute::{MedianImputer, MostFrequentImputer};
pub use scale::StandardScaler;

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::{ClinicalTable, PatientRecord};

/// Errors produced while fitting or applying the preprocessor.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessError {
    /// Fit called on an empty table.
    EmptyTable,
    /// A column contained no observed values to learn from.
    AllMissing { column: &'static str },
    /// Transform called with a table of the wrong width.
    ColumnCount { expected: usize, got: usize },
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "cannot fit preprocessor on an empty table"),
            Self::AllMissing { column } => {
                write!(f, "column {column} has no observed values to fit on")
            }
            Self::ColumnCount { expected, got } => {
                write!(f, "expected {expected} feature columns, got {got}")
            }
        }
    }
}

impl std::error::Error for PreprocessError {}

// =============================================================================
// Fitted stages
// =============================================================================

/// Fitted numeric branch for one column: impute, then scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStage {
    pub column: usize,
    pub name: String,
    pub imputer: MedianImputer,
    pub scaler: StandardScaler,
}

impl NumericStage {
    #[inline]
    fn apply(&self, value: f32) -> f32 {
        self.scaler.apply(self.imputer.apply(value))
    }
}

/// Fitted categorical branch for one column: impute, then one-hot encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStage {
    pub column: usize,
    pub name: String,
    pub imputer: MostFrequentImputer,
    pub encoder: OneHotEncoder,
}

impl CategoricalStage {
    #[inline]
    fn encode_into(&self, value: f32, out: &mut [f32]) {
        self.encoder.encode_into(self.imputer.apply(value), out);
    }
}

// =============================================================================
// Preprocessor
// =============================================================================

/// Unfitted preprocessor.
///
/// The column grouping is fixed by the schema, so this type only exists to
/// make the fit-then-transform contract explicit at call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    /// Fit all column statistics on a training table.
    pub fn fit(table: &ClinicalTable) -> Result<FittedPreprocessor, PreprocessError> {
        if table.n_samples() == 0 {
            return Err(PreprocessError::EmptyTable);
        }

        let schema = *table.schema();
        let mut numeric = Vec::new();
        for column in schema.numeric_indices() {
            let name = schema.name(column);
            let values = table.column(column);

            let imputer = MedianImputer::fit(values.iter().copied())
                .ok_or(PreprocessError::AllMissing { column: name })?;
            let imputed: Vec<f32> = values.iter().map(|&v| imputer.apply(v)).collect();
            let scaler = StandardScaler::fit(&imputed);

            numeric.push(NumericStage { column, name: name.to_string(), imputer, scaler });
        }

        let mut categorical = Vec::new();
        for column in schema.categorical_indices() {
            let name = schema.name(column);
            let values = table.column(column);

            let imputer = MostFrequentImputer::fit(values.iter().copied())
                .ok_or(PreprocessError::AllMissing { column: name })?;
            let encoder = OneHotEncoder::fit(values.iter().map(|&v| imputer.apply(v)));

            categorical.push(CategoricalStage { column, name: name.to_string(), imputer, encoder });
        }

        Ok(FittedPreprocessor { n_input_features: schema.n_features(), numeric, categorical })
    }
}

/// The fitted column transformer.
///
/// Output layout: the scaled numeric columns first (in schema order),
/// followed by each categorical column's one-hot indicator block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    n_input_features: usize,
    numeric: Vec<NumericStage>,
    categorical: Vec<CategoricalStage>,
}

impl FittedPreprocessor {
    /// Number of raw input feature columns.
    #[inline]
    pub fn n_input_features(&self) -> usize {
        self.n_input_features
    }

    /// Number of transformed output features.
    pub fn n_output_features(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.encoder.width()).sum::<usize>()
    }

    /// Names of the transformed output features, e.g. `Age` or `Sex=1`.
    pub fn output_feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|s| s.name.clone()).collect();
        for stage in &self.categorical {
            for code in stage.encoder.categories() {
                names.push(format!("{}={}", stage.name, code));
            }
        }
        names
    }

    /// The fitted numeric stages.
    pub fn numeric_stages(&self) -> &[NumericStage] {
        &self.numeric
    }

    /// The fitted categorical stages.
    pub fn categorical_stages(&self) -> &[CategoricalStage] {
        &self.categorical
    }

    /// Transform a whole table into the model feature matrix.
    ///
    /// Output is feature-major: `[n_output_features, n_samples]`.
    pub fn transform(&self, table: &ClinicalTable) -> Result<Array2<f32>, PreprocessError> {
        if table.n_features() != self.n_input_features {
            return Err(PreprocessError::ColumnCount {
                expected: self.n_input_features,
                got: table.n_features(),
            });
        }

        let n_samples = table.n_samples();
        let mut output = Array2::zeros((self.n_output_features(), n_samples));

        let mut out_row = 0;
        for stage in &self.numeric {
            let column = table.column(stage.column);
            for sample in 0..n_samples {
                output[[out_row, sample]] = stage.apply(column[sample]);
            }
            out_row += 1;
        }

        let mut block = Vec::new();
        for stage in &self.categorical {
            let width = stage.encoder.width();
            block.resize(width, 0.0);
            let column = table.column(stage.column);
            for sample in 0..n_samples {
                stage.encode_into(column[sample], &mut block);
                for (offset, &v) in block.iter().enumerate() {
                    output[[out_row + offset, sample]] = v;
                }
            }
            out_row += width;
        }

        Ok(output)
    }

    /// Transform one raw feature row (schema column order).
    pub fn transform_row(&self, row: &[f32]) -> Result<Vec<f32>, PreprocessError> {
        if row.len() != self.n_input_features {
            return Err(PreprocessError::ColumnCount {
                expected: self.n_input_features,
                got: row.len(),
            });
        }
        Ok(self.transform_row_inner(row))
    }

    /// Transform a typed record. Infallible: the record's layout is the
    /// schema's by construction.
    pub fn transform_record(&self, record: &PatientRecord) -> Vec<f32> {
        let row = record.to_row();
        debug_assert_eq!(row.len(), self.n_input_features);
        self.transform_row_inner(&row)
    }

    fn transform_row_inner(&self, row: &[f32]) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.n_output_features());
        for stage in &self.numeric {
            out.push(stage.apply(row[stage.column]));
        }
        for stage in &self.categorical {
            let start = out.len();
            out.resize(start + stage.encoder.width(), 0.0);
            stage.encode_into(row[stage.column], &mut out[start..]);
        }
        out
    }
}
