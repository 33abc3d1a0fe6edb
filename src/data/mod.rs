//! Data loading and preparation.
//!
//! The path from a raw CSV file to training-ready data:
//!
//! 1. [`load_csv`] reads typed rows into a feature-major [`ClinicalTable`]
//! 2. [`scrub_invalid_zeros`] rewrites sentinel zeros to missing markers
//! 3. [`stratified_split`] carves out a class-balanced test partition

mod cleaner;
mod loader;
mod record;
mod schema;
mod split;
mod table;

pub use cleaner::scrub_invalid_zeros;
pub use loader::{load_csv, DataError};
pub use record::{
    ChestPainType, ExerciseAngina, FastingBs, ParseCategoryError, PatientRecord, RestingEcg, Sex,
    StSlope,
};
pub use schema::{ColumnSchema, FeatureColumn, FeatureKind, LABEL_COLUMN};
pub use split::{stratified_split, SplitError};
pub use table::ClinicalTable;
