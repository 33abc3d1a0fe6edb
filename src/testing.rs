//! Shared fixtures for unit and integration tests.
//!
//! Kept in the library (not `#[cfg(test)]`) so integration tests under
//! `tests/` can use the same data.

use crate::data::ClinicalTable;
use crate::model::BoostConfig;

/// Small hand-made training table with a visible risk signal.
///
/// Column order: Age, Sex, ChestPainType, RestingBP, Cholesterol,
/// FastingBS, RestingECG, MaxHR, ExerciseAngina, Oldpeak, ST_Slope.
/// Categorical cells hold category codes. A couple of rows carry the
/// sentinel zeros the cleaner is supposed to scrub.
pub fn training_table() -> ClinicalTable {
    let rows: Vec<([f32; 11], f32)> = vec![
        ([40.0, 0.0, 1.0, 140.0, 289.0, 0.0, 0.0, 172.0, 0.0, 0.0, 0.0], 0.0),
        ([49.0, 1.0, 2.0, 160.0, 180.0, 0.0, 0.0, 156.0, 0.0, 1.0, 1.0], 1.0),
        ([37.0, 0.0, 1.0, 130.0, 283.0, 0.0, 1.0, 98.0, 0.0, 0.0, 0.0], 0.0),
        ([48.0, 1.0, 0.0, 138.0, 214.0, 0.0, 0.0, 108.0, 1.0, 1.5, 1.0], 1.0),
        ([54.0, 0.0, 2.0, 150.0, 195.0, 0.0, 0.0, 122.0, 0.0, 0.0, 0.0], 0.0),
        ([39.0, 0.0, 2.0, 120.0, 339.0, 0.0, 0.0, 170.0, 0.0, 0.0, 0.0], 0.0),
        ([45.0, 1.0, 1.0, 130.0, 237.0, 0.0, 0.0, 170.0, 0.0, 0.0, 0.0], 0.0),
        ([54.0, 0.0, 1.0, 110.0, 208.0, 0.0, 0.0, 142.0, 0.0, 0.0, 0.0], 0.0),
        ([37.0, 0.0, 0.0, 140.0, 207.0, 0.0, 0.0, 130.0, 1.0, 1.5, 1.0], 1.0),
        ([48.0, 1.0, 1.0, 120.0, 284.0, 0.0, 0.0, 120.0, 0.0, 0.0, 0.0], 0.0),
        ([58.0, 0.0, 0.0, 136.0, 164.0, 0.0, 1.0, 99.0, 1.0, 2.0, 1.0], 1.0),
        ([39.0, 0.0, 0.0, 120.0, 204.0, 0.0, 0.0, 145.0, 0.0, 0.0, 0.0], 0.0),
        ([49.0, 0.0, 0.0, 140.0, 234.0, 0.0, 0.0, 140.0, 1.0, 1.0, 1.0], 1.0),
        ([42.0, 1.0, 2.0, 115.0, 211.0, 0.0, 1.0, 137.0, 0.0, 0.0, 0.0], 0.0),
        ([54.0, 1.0, 1.0, 120.0, 273.0, 0.0, 0.0, 150.0, 0.0, 1.5, 1.0], 0.0),
        ([38.0, 0.0, 0.0, 110.0, 196.0, 0.0, 0.0, 166.0, 0.0, 0.0, 1.0], 1.0),
        ([43.0, 1.0, 0.0, 120.0, 201.0, 0.0, 0.0, 165.0, 0.0, 0.0, 0.0], 0.0),
        ([60.0, 0.0, 0.0, 100.0, 248.0, 0.0, 0.0, 125.0, 0.0, 1.0, 1.0], 1.0),
        ([36.0, 0.0, 1.0, 120.0, 267.0, 0.0, 0.0, 160.0, 0.0, 3.0, 1.0], 1.0),
        ([43.0, 1.0, 3.0, 100.0, 223.0, 0.0, 0.0, 142.0, 0.0, 0.0, 0.0], 0.0),
        ([44.0, 0.0, 1.0, 120.0, 184.0, 0.0, 0.0, 142.0, 0.0, 1.0, 1.0], 0.0),
        ([49.0, 1.0, 1.0, 124.0, 201.0, 0.0, 0.0, 164.0, 0.0, 0.0, 0.0], 0.0),
        ([44.0, 0.0, 1.0, 150.0, 288.0, 0.0, 0.0, 150.0, 1.0, 3.0, 1.0], 1.0),
        ([40.0, 0.0, 2.0, 130.0, 215.0, 0.0, 0.0, 138.0, 0.0, 0.0, 0.0], 0.0),
        ([36.0, 0.0, 2.0, 130.0, 209.0, 0.0, 0.0, 178.0, 0.0, 0.0, 0.0], 0.0),
        ([53.0, 0.0, 0.0, 124.0, 260.0, 0.0, 1.0, 112.0, 1.0, 3.0, 1.0], 0.0),
        ([52.0, 0.0, 0.0, 120.0, 284.0, 0.0, 0.0, 118.0, 0.0, 0.0, 1.0], 1.0),
        ([53.0, 1.0, 0.0, 113.0, 468.0, 0.0, 0.0, 127.0, 0.0, 0.0, 1.0], 1.0),
        ([51.0, 0.0, 1.0, 125.0, 188.0, 0.0, 0.0, 145.0, 0.0, 0.0, 0.0], 0.0),
        ([53.0, 0.0, 2.0, 145.0, 518.0, 0.0, 0.0, 130.0, 0.0, 0.0, 1.0], 1.0),
        ([56.0, 0.0, 2.0, 130.0, 0.0, 0.0, 0.0, 114.0, 0.0, 0.0, 0.0], 0.0),
        ([54.0, 0.0, 0.0, 125.0, 224.0, 0.0, 0.0, 122.0, 0.0, 2.0, 1.0], 1.0),
        ([41.0, 0.0, 0.0, 130.0, 172.0, 0.0, 1.0, 130.0, 0.0, 2.0, 1.0], 1.0),
        ([43.0, 1.0, 1.0, 150.0, 186.0, 0.0, 0.0, 154.0, 0.0, 0.0, 0.0], 0.0),
        ([32.0, 0.0, 1.0, 125.0, 254.0, 0.0, 0.0, 155.0, 0.0, 0.0, 0.0], 0.0),
        ([65.0, 0.0, 0.0, 140.0, 306.0, 1.0, 0.0, 87.0, 1.0, 1.5, 1.0], 1.0),
        ([41.0, 1.0, 1.0, 110.0, 250.0, 0.0, 1.0, 142.0, 0.0, 0.0, 0.0], 0.0),
        ([48.0, 1.0, 1.0, 120.0, 177.0, 1.0, 1.0, 148.0, 0.0, 0.0, 0.0], 0.0),
        ([48.0, 0.0, 0.0, 0.0, 227.0, 0.0, 0.0, 130.0, 1.0, 1.0, 1.0], 0.0),
        ([54.0, 1.0, 0.0, 150.0, 230.0, 0.0, 0.0, 130.0, 1.0, 2.5, 1.0], 1.0),
    ];

    let labels: Vec<f32> = rows.iter().map(|(_, l)| *l).collect();
    let features: Vec<[f32; 11]> = rows.into_iter().map(|(r, _)| r).collect();
    ClinicalTable::from_rows(&features, Some(labels))
}

/// Config small enough for fast tests but big enough to learn the fixture.
pub fn quick_config() -> BoostConfig {
    BoostConfig::builder()
        .n_trees(25)
        .max_depth(3)
        .min_child_weight(0.0)
        .build()
        .expect("quick test config is valid")
}
