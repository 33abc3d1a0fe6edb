//! Clinical feature schema.
//!
//! The column layout of the heart-disease dataset is fixed: eleven feature
//! columns plus one label column. Every non-label column belongs to exactly
//! one of two treatment groups (numeric or categorical), which drives the
//! preprocessing pipeline built in [`crate::preprocess`].

/// Name of the binary label column (present in training data only).
pub const LABEL_COLUMN: &str = "HeartDisease";

/// How a feature column is treated by the preprocessor.
///
/// Values are stored as `f32` regardless of kind; missing values are
/// `f32::NAN`. Categorical columns hold integer category codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FeatureKind {
    /// Continuous numeric feature: median imputation, then standardization.
    #[default]
    Numeric,

    /// Categorical feature stored as an integer category code:
    /// most-frequent imputation, then one-hot encoding.
    Categorical,
}

impl FeatureKind {
    /// Returns true if this is a categorical feature.
    #[inline]
    pub fn is_categorical(&self) -> bool {
        matches!(self, FeatureKind::Categorical)
    }

    /// Returns true if this is a numeric feature.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, FeatureKind::Numeric)
    }
}

/// Name and treatment group of one feature column.
#[derive(Clone, Copy, Debug)]
pub struct FeatureColumn {
    pub name: &'static str,
    pub kind: FeatureKind,
}

/// The fixed feature columns, in CSV order.
static FEATURE_COLUMNS: [FeatureColumn; 11] = [
    FeatureColumn { name: "Age", kind: FeatureKind::Numeric },
    FeatureColumn { name: "Sex", kind: FeatureKind::Categorical },
    FeatureColumn { name: "ChestPainType", kind: FeatureKind::Categorical },
    FeatureColumn { name: "RestingBP", kind: FeatureKind::Numeric },
    FeatureColumn { name: "Cholesterol", kind: FeatureKind::Numeric },
    FeatureColumn { name: "FastingBS", kind: FeatureKind::Categorical },
    FeatureColumn { name: "RestingECG", kind: FeatureKind::Categorical },
    FeatureColumn { name: "MaxHR", kind: FeatureKind::Numeric },
    FeatureColumn { name: "ExerciseAngina", kind: FeatureKind::Categorical },
    FeatureColumn { name: "Oldpeak", kind: FeatureKind::Numeric },
    FeatureColumn { name: "ST_Slope", kind: FeatureKind::Categorical },
];

/// Schema describing the clinical feature columns.
///
/// A zero-sized handle over the fixed column table; exists so table and
/// preprocessing code talk to one authority for names, order, and kinds.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColumnSchema;

impl ColumnSchema {
    /// Number of feature columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        FEATURE_COLUMNS.len()
    }

    /// Column name by index.
    #[inline]
    pub fn name(&self, index: usize) -> &'static str {
        FEATURE_COLUMNS[index].name
    }

    /// Treatment group by index.
    #[inline]
    pub fn kind(&self, index: usize) -> FeatureKind {
        FEATURE_COLUMNS[index].kind
    }

    /// Feature index by name. Returns `None` for unknown names (including
    /// the label column, which is not a feature).
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        FEATURE_COLUMNS.iter().position(|c| c.name == name)
    }

    /// Indices of the numeric columns, in column order.
    pub fn numeric_indices(&self) -> Vec<usize> {
        self.indices_of(FeatureKind::Numeric)
    }

    /// Indices of the categorical columns, in column order.
    pub fn categorical_indices(&self) -> Vec<usize> {
        self.indices_of(FeatureKind::Categorical)
    }

    fn indices_of(&self, kind: FeatureKind) -> Vec<usize> {
        FEATURE_COLUMNS
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Iterate over (index, column) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'static FeatureColumn)> {
        FEATURE_COLUMNS.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_kind_predicates() {
        assert!(FeatureKind::Categorical.is_categorical());
        assert!(!FeatureKind::Numeric.is_categorical());
        assert!(FeatureKind::Numeric.is_numeric());
    }

    #[test]
    fn schema_has_eleven_features() {
        assert_eq!(ColumnSchema.n_features(), 11);
    }

    #[test]
    fn partition_covers_all_features_without_overlap() {
        let schema = ColumnSchema;
        let numeric = schema.numeric_indices();
        let categorical = schema.categorical_indices();

        assert_eq!(numeric.len() + categorical.len(), schema.n_features());
        for idx in &numeric {
            assert!(!categorical.contains(idx), "column {idx} in both groups");
        }

        let mut all: Vec<usize> = numeric.into_iter().chain(categorical).collect();
        all.sort_unstable();
        let expected: Vec<usize> = (0..schema.n_features()).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn partition_matches_column_roles() {
        let schema = ColumnSchema;
        let numeric: Vec<&str> = schema.numeric_indices().iter().map(|&i| schema.name(i)).collect();
        let categorical: Vec<&str> =
            schema.categorical_indices().iter().map(|&i| schema.name(i)).collect();

        assert_eq!(numeric, ["Age", "RestingBP", "Cholesterol", "MaxHR", "Oldpeak"]);
        assert_eq!(
            categorical,
            ["Sex", "ChestPainType", "FastingBS", "RestingECG", "ExerciseAngina", "ST_Slope"]
        );
    }

    #[test]
    fn feature_index_lookup() {
        let schema = ColumnSchema;
        assert_eq!(schema.feature_index("Age"), Some(0));
        assert_eq!(schema.feature_index("ST_Slope"), Some(10));
        assert_eq!(schema.feature_index(LABEL_COLUMN), None);
        assert_eq!(schema.feature_index("nope"), None);
    }
}
