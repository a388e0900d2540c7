//! Aggregation queries. Each function takes a read connection and a file id
//! and returns plain rows; a file without data yields an empty vector.

pub mod context;
pub mod demographics;
pub mod department;
pub mod files;
pub mod instrument;
pub mod report;

use rusqlite::{Params, Row, Statement};
use survey_core::errors::StorageError;
use survey_storage::sqlite_error;

/// Label used for NULL group keys.
pub const UNKNOWN_LABEL: &str = "(none)";

/// Round `value` to `places` decimals, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Percentage of `part` in `total` rounded to one decimal; 0 for an empty total.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / total as f64, 1)
}

fn collect_rows<T, P, F>(stmt: &mut Statement<'_>, params: P, f: F) -> Result<Vec<T>, StorageError>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let rows = stmt.query_map(params, f).map_err(sqlite_error)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_error)
}
