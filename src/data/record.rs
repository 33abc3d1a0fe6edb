//! Typed clinical record for single-row inference.
//!
//! [`PatientRecord`] is the inference-side input type: all eleven features,
//! fully populated, with the categorical fields as enums carrying stable
//! integer codes. The CSV loader does not go through this type (raw rows may
//! have missing cells); it encodes straight into the table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error parsing a categorical value from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} value `{}` (expected one of: {})",
            self.field,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for ParseCategoryError {}

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident / $field:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal => $spelling:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All variants, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The spellings used in the CSV file and user input.
            pub const SPELLINGS: &'static [&'static str] = &[$($spelling),+];

            /// Stable integer category code.
            #[inline]
            pub fn code(&self) -> u32 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// CSV spelling of this category.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $spelling),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($spelling) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseCategoryError {
                    field: $field,
                    value: trimmed.to_string(),
                    expected: $name::SPELLINGS,
                })
            }
        }
    };
}

category_enum! {
    /// Patient sex.
    Sex / "Sex" {
        M = 0 => "M",
        F = 1 => "F",
    }
}

category_enum! {
    /// Chest pain classification.
    ChestPainType / "ChestPainType" {
        /// Asymptomatic.
        #[serde(rename = "ASY")] Asy = 0 => "ASY",
        /// Atypical angina.
        #[serde(rename = "ATA")] Ata = 1 => "ATA",
        /// Non-anginal pain.
        #[serde(rename = "NAP")] Nap = 2 => "NAP",
        /// Typical angina.
        #[serde(rename = "TA")] Ta = 3 => "TA",
    }
}

category_enum! {
    /// Fasting blood sugar above 120 mg/dL. Binary, but the dataset treats
    /// it as a categorical column, so it one-hot encodes like the rest.
    FastingBs / "FastingBS" {
        #[serde(rename = "0")] No = 0 => "0",
        #[serde(rename = "1")] Yes = 1 => "1",
    }
}

category_enum! {
    /// Resting electrocardiogram result.
    RestingEcg / "RestingECG" {
        Normal = 0 => "Normal",
        /// ST-T wave abnormality.
        #[serde(rename = "ST")] St = 1 => "ST",
        /// Left ventricular hypertrophy.
        #[serde(rename = "LVH")] Lvh = 2 => "LVH",
    }
}

category_enum! {
    /// Exercise-induced angina.
    ExerciseAngina / "ExerciseAngina" {
        N = 0 => "N",
        Y = 1 => "Y",
    }
}

category_enum! {
    /// Slope of the peak-exercise ST segment.
    StSlope / "ST_Slope" {
        Up = 0 => "Up",
        Flat = 1 => "Flat",
        Down = 2 => "Down",
    }
}

// =============================================================================
// PatientRecord
// =============================================================================

/// One fully-populated clinical record, as submitted for inference.
///
/// The pipeline requires the same column layout that was used at fit time;
/// this type enforces it structurally, so single-record prediction cannot
/// fail on a schema mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    /// Age in years.
    pub age: f32,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure in mmHg.
    pub resting_bp: f32,
    /// Serum cholesterol in mg/dL.
    pub cholesterol: f32,
    pub fasting_bs: FastingBs,
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved, in bpm.
    pub max_hr: f32,
    pub exercise_angina: ExerciseAngina,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: f32,
    pub st_slope: StSlope,
}

impl PatientRecord {
    /// Encode into a raw feature row in schema column order.
    ///
    /// Numeric columns carry their values directly; categorical columns
    /// carry their integer category codes as `f32`.
    pub fn to_row(&self) -> [f32; 11] {
        [
            self.age,
            self.sex.code() as f32,
            self.chest_pain_type.code() as f32,
            self.resting_bp,
            self.cholesterol,
            self.fasting_bs.code() as f32,
            self.resting_ecg.code() as f32,
            self.max_hr,
            self.exercise_angina.code() as f32,
            self.oldpeak,
            self.st_slope.code() as f32,
        ]
    }

    /// Reference record for a typically healthy patient (used by the
    /// inference shell's example prefill).
    pub fn example_healthy() -> Self {
        Self {
            age: 35.0,
            sex: Sex::M,
            chest_pain_type: ChestPainType::Nap,
            resting_bp: 115.0,
            cholesterol: 180.0,
            fasting_bs: FastingBs::No,
            resting_ecg: RestingEcg::Normal,
            max_hr: 165.0,
            exercise_angina: ExerciseAngina::N,
            oldpeak: 0.5,
            st_slope: StSlope::Up,
        }
    }

    /// Reference record for a patient with elevated risk markers (used by
    /// the inference shell's example prefill).
    pub fn example_at_risk() -> Self {
        Self {
            age: 68.0,
            sex: Sex::F,
            chest_pain_type: ChestPainType::Asy,
            resting_bp: 180.0,
            cholesterol: 350.0,
            fasting_bs: FastingBs::Yes,
            resting_ecg: RestingEcg::Lvh,
            max_hr: 95.0,
            exercise_angina: ExerciseAngina::Y,
            oldpeak: 4.2,
            st_slope: StSlope::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::ColumnSchema;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Sex::M.code(), 0);
        assert_eq!(Sex::F.code(), 1);
        assert_eq!(ChestPainType::Asy.code(), 0);
        assert_eq!(ChestPainType::Ta.code(), 3);
        assert_eq!(RestingEcg::Lvh.code(), 2);
        assert_eq!(StSlope::Down.code(), 2);
    }

    #[test]
    fn parse_round_trips_spellings() {
        assert_eq!(ChestPainType::ALL.len(), ChestPainType::SPELLINGS.len());
        for (&variant, &s) in ChestPainType::ALL.iter().zip(ChestPainType::SPELLINGS) {
            assert_eq!(s.parse::<ChestPainType>().unwrap(), variant);
            assert_eq!(variant.as_str(), s);
        }
        assert_eq!("flat".parse::<StSlope>().unwrap(), StSlope::Flat);
        assert_eq!(" lvh ".parse::<RestingEcg>().unwrap(), RestingEcg::Lvh);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = "XYZ".parse::<ChestPainType>().unwrap_err();
        assert_eq!(err.field, "ChestPainType");
        assert!(err.to_string().contains("ASY"));
    }

    #[test]
    fn row_follows_schema_order() {
        let schema = ColumnSchema;
        let record = PatientRecord::example_healthy();
        let row = record.to_row();

        assert_eq!(row.len(), schema.n_features());
        assert_eq!(row[schema.feature_index("Age").unwrap()], 35.0);
        assert_eq!(row[schema.feature_index("ChestPainType").unwrap()], 2.0); // NAP
        assert_eq!(row[schema.feature_index("Oldpeak").unwrap()], 0.5);
        assert_eq!(row[schema.feature_index("ST_Slope").unwrap()], 0.0); // Up
    }
}
