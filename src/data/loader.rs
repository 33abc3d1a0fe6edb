//! CSV loading for clinical record tables.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::record::{ChestPainType, ExerciseAngina, FastingBs, RestingEcg, Sex, StSlope};
use super::table::ClinicalTable;

/// Errors produced while loading a dataset.
#[derive(Debug)]
pub enum DataError {
    /// File could not be opened.
    Io(std::io::Error),
    /// A row failed to parse (bad number, unknown category spelling, wrong
    /// column count).
    Csv(csv::Error),
    /// The file parsed but contained no data rows.
    EmptyDataset,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to open dataset: {e}"),
            Self::Csv(e) => write!(f, "failed to parse dataset: {e}"),
            Self::EmptyDataset => write!(f, "dataset contains no rows"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            Self::EmptyDataset => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// One raw CSV row. Numeric and categorical cells may be empty; an empty
/// cell becomes a missing marker in the table.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Age")]
    age: Option<f32>,
    #[serde(rename = "Sex")]
    sex: Option<Sex>,
    #[serde(rename = "ChestPainType")]
    chest_pain_type: Option<ChestPainType>,
    #[serde(rename = "RestingBP")]
    resting_bp: Option<f32>,
    #[serde(rename = "Cholesterol")]
    cholesterol: Option<f32>,
    #[serde(rename = "FastingBS")]
    fasting_bs: Option<FastingBs>,
    #[serde(rename = "RestingECG")]
    resting_ecg: Option<RestingEcg>,
    #[serde(rename = "MaxHR")]
    max_hr: Option<f32>,
    #[serde(rename = "ExerciseAngina")]
    exercise_angina: Option<ExerciseAngina>,
    #[serde(rename = "Oldpeak")]
    oldpeak: Option<f32>,
    #[serde(rename = "ST_Slope")]
    st_slope: Option<StSlope>,
    #[serde(rename = "HeartDisease", default)]
    heart_disease: Option<f32>,
}

impl CsvRow {
    fn to_feature_row(&self) -> [f32; 11] {
        fn num(v: Option<f32>) -> f32 {
            v.unwrap_or(f32::NAN)
        }
        fn cat(code: Option<u32>) -> f32 {
            code.map(|c| c as f32).unwrap_or(f32::NAN)
        }

        [
            num(self.age),
            cat(self.sex.map(|v| v.code())),
            cat(self.chest_pain_type.map(|v| v.code())),
            num(self.resting_bp),
            num(self.cholesterol),
            cat(self.fasting_bs.map(|v| v.code())),
            cat(self.resting_ecg.map(|v| v.code())),
            num(self.max_hr),
            cat(self.exercise_angina.map(|v| v.code())),
            num(self.oldpeak),
            cat(self.st_slope.map(|v| v.code())),
        ]
    }
}

/// Load a clinical record table from a CSV file.
///
/// The header row is required and columns are matched by name, so column
/// order in the file does not matter. The `HeartDisease` label column is
/// optional; when present on every row the table carries labels.
pub fn load_csv(path: impl AsRef<Path>) -> Result<ClinicalTable, DataError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    let mut labeled_rows = 0usize;

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        rows.push(row.to_feature_row());
        if let Some(label) = row.heart_disease {
            labeled_rows += 1;
            labels.push(label);
        } else {
            labels.push(f32::NAN);
        }
    }

    if rows.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    // Carry labels only if every row has one; a partially labeled file is
    // treated as unlabeled.
    let labels = (labeled_rows == rows.len()).then_some(labels);

    info!(
        path = %path.display(),
        rows = rows.len(),
        labeled = labels.is_some(),
        "loaded clinical dataset"
    );

    Ok(ClinicalTable::from_rows(&rows, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("cardiorisk-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const HEADER: &str = "Age,Sex,ChestPainType,RestingBP,Cholesterol,FastingBS,RestingECG,MaxHR,ExerciseAngina,Oldpeak,ST_Slope,HeartDisease";

    #[test]
    fn loads_labeled_rows() {
        let csv = format!(
            "{HEADER}\n40,M,ATA,140,289,0,Normal,172,N,0.0,Up,0\n49,F,NAP,160,180,0,Normal,156,N,1.0,Flat,1\n"
        );
        let path = write_temp_csv("labeled.csv", &csv);
        let table = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.n_samples(), 2);
        assert!(table.has_labels());
        assert_eq!(table.labels().unwrap().to_vec(), vec![0.0, 1.0]);
        // Sex codes: M=0, F=1
        assert_eq!(table.column_by_name("Sex").unwrap().to_vec(), vec![0.0, 1.0]);
        // ChestPainType codes: ATA=1, NAP=2
        assert_eq!(
            table.column_by_name("ChestPainType").unwrap().to_vec(),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn empty_cells_become_missing() {
        let csv = format!("{HEADER}\n40,M,ATA,,289,0,Normal,172,N,0.0,Up,0\n");
        let path = write_temp_csv("missing.csv", &csv);
        let table = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(table.column_by_name("RestingBP").unwrap()[0].is_nan());
        assert_eq!(table.column_by_name("Cholesterol").unwrap()[0], 289.0);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let csv = format!("{HEADER}\n40,X,ATA,140,289,0,Normal,172,N,0.0,Up,0\n");
        let path = write_temp_csv("badcat.csv", &csv);
        let result = load_csv(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(DataError::Csv(_))));
    }

    #[test]
    fn missing_label_column_loads_unlabeled() {
        let header = HEADER.trim_end_matches(",HeartDisease");
        let csv = format!("{header}\n40,M,ATA,140,289,0,Normal,172,N,0.0,Up\n");
        let path = write_temp_csv("unlabeled.csv", &csv);
        let table = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!table.has_labels());
    }

    #[test]
    fn empty_file_is_an_error() {
        let path = write_temp_csv("empty.csv", &format!("{HEADER}\n"));
        let result = load_csv(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(DataError::EmptyDataset)));
    }
}
