//! Sentinel-value cleaning for raw clinical tables.
//!
//! The source data encodes "not measured" as a literal zero in two columns
//! where zero is physiologically impossible. Left in place, those zeros
//! would skew the median imputer and the scaler, so they are rewritten to
//! missing markers before any fitting happens.
//!
//! This is a domain convention over exactly these two columns, not a
//! general rule. It runs on raw training tables only; inference records are
//! constructed field-by-field and never carry sentinel zeros.

use tracing::debug;

use super::table::ClinicalTable;

/// Columns where a zero is a sentinel for "missing".
const ZERO_SENTINEL_COLUMNS: [&str; 2] = ["RestingBP", "Cholesterol"];

/// Replace sentinel zeros in `RestingBP` and `Cholesterol` with `NaN`.
///
/// Purely functional: consumes the table and returns the corrected one.
/// No other cell is touched.
pub fn scrub_invalid_zeros(mut table: ClinicalTable) -> ClinicalTable {
    for name in ZERO_SENTINEL_COLUMNS {
        let feature = table
            .schema()
            .feature_index(name)
            .expect("sentinel columns are part of the fixed schema");

        let mut scrubbed = 0usize;
        for sample in 0..table.n_samples() {
            if table.column(feature)[sample] == 0.0 {
                table.set(feature, sample, f32::NAN);
                scrubbed += 1;
            }
        }

        if scrubbed > 0 {
            debug!(column = name, count = scrubbed, "scrubbed sentinel zeros");
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(resting_bp: f32, cholesterol: f32) -> [f32; 11] {
        [54.0, 0.0, 0.0, resting_bp, cholesterol, 0.0, 0.0, 160.0, 0.0, 1.2, 0.0]
    }

    #[test]
    fn zero_bp_and_cholesterol_become_missing() {
        let table = ClinicalTable::from_rows(
            &[row_with(0.0, 220.0), row_with(130.0, 0.0), row_with(0.0, 0.0)],
            Some(vec![0.0, 1.0, 1.0]),
        );
        let cleaned = scrub_invalid_zeros(table);

        let bp = cleaned.column_by_name("RestingBP").unwrap();
        let chol = cleaned.column_by_name("Cholesterol").unwrap();
        assert!(bp[0].is_nan());
        assert_eq!(bp[1], 130.0);
        assert!(bp[2].is_nan());
        assert_eq!(chol[0], 220.0);
        assert!(chol[1].is_nan());
        assert!(chol[2].is_nan());
    }

    #[test]
    fn other_cells_are_untouched() {
        let rows = [row_with(0.0, 0.0)];
        let table = ClinicalTable::from_rows(&rows, Some(vec![1.0]));
        let cleaned = scrub_invalid_zeros(table);

        let schema = *cleaned.schema();
        for (feature, column) in schema.iter() {
            if ZERO_SENTINEL_COLUMNS.contains(&column.name) {
                continue;
            }
            assert_eq!(
                cleaned.column(feature)[0],
                rows[0][feature],
                "column {} changed",
                column.name
            );
        }
        assert_eq!(cleaned.labels().unwrap()[0], 1.0);
    }

    #[test]
    fn legitimate_zeros_elsewhere_survive() {
        // Oldpeak of 0.0 is a real measurement and must stay.
        let table = ClinicalTable::from_rows(
            &[[54.0, 0.0, 0.0, 130.0, 220.0, 0.0, 0.0, 160.0, 0.0, 0.0, 0.0]],
            None,
        );
        let cleaned = scrub_invalid_zeros(table);
        assert_eq!(cleaned.column_by_name("Oldpeak").unwrap()[0], 0.0);
    }
}
