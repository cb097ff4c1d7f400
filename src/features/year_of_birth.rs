//! Year-of-birth extraction (`extract_year_of_birth`, version 1).
//!
//! Replaces the raw `customerdob` column with an integer `year_of_birth`
//! column. Coercion is non-strict: a value that is not a four-digit calendar
//! year becomes a missing cell instead of failing the row.

use chrono::{Datelike, NaiveDate};

use super::{Cell, FeatureRow, TransformError};

pub const SOURCE_COLUMN: &str = "customerdob";
pub const OUTPUT_COLUMN: &str = "year_of_birth";

/// Parse a `%Y` year: exactly four ASCII digits naming year 0001..=9999.
pub fn parse_birth_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = raw.parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.year())
}

/// Drop `customerdob` and add `year_of_birth` (integer or missing).
pub fn extract_year_of_birth(mut row: FeatureRow) -> Result<FeatureRow, TransformError> {
    let raw = row
        .remove(SOURCE_COLUMN)
        .ok_or_else(|| TransformError::MissingColumn(SOURCE_COLUMN.to_string()))?;

    let year = match raw {
        Cell::Text(s) => parse_birth_year(&s),
        Cell::Int(v) => parse_birth_year(&v.to_string()),
        Cell::Missing => None,
    };

    let cell = year.map(|y| Cell::Int(i64::from(y))).unwrap_or(Cell::Missing);
    row.insert(OUTPUT_COLUMN, cell);
    Ok(row)
}
