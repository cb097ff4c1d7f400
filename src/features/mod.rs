//! Feature rows and the versioned feature transforms that run inside the
//! prediction pipeline.
//!
//! A [`FeatureRow`] is one row of a table: ordered `(column, cell)` pairs.
//! The applicant record becomes a row, the pipeline's declared transform
//! reshapes it, and the encoder reads the result by column name.

use thiserror::Error;

use crate::domain::ApplicantRecord;

pub mod transform;
pub mod year_of_birth;

pub use transform::{FeatureTransform, TransformId};
pub use year_of_birth::{extract_year_of_birth, parse_birth_year};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Missing,
}

/// What a column holds once it is in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

/// Columns of the raw applicant row, in record order.
pub const RECORD_SCHEMA: [(&str, ColumnKind); 8] = [
    ("sex", ColumnKind::Text),
    ("customerdob", ColumnKind::Text),
    ("smokingclass", ColumnKind::Text),
    ("maritalstatus", ColumnKind::Text),
    ("coverageunit", ColumnKind::Numeric),
    ("policyterm", ColumnKind::Numeric),
    ("prodcode", ColumnKind::Text),
    ("issuestate", ColumnKind::Text),
];

/// Structural failures while reshaping a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("column '{0}' is not present in the input row")]
    MissingColumn(String),
}

/// One row of named cells (column order preserved).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureRow {
    cells: Vec<(String, Cell)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the raw row for an applicant (columns in record order).
    pub fn from_record(record: &ApplicantRecord) -> Self {
        let mut row = Self::new();
        row.insert("sex", Cell::Text(record.sex.clone()));
        row.insert("customerdob", Cell::Text(record.customerdob.clone()));
        row.insert("smokingclass", Cell::Text(record.smokingclass.clone()));
        row.insert("maritalstatus", Cell::Text(record.maritalstatus.clone()));
        row.insert("coverageunit", Cell::Int(i64::from(record.coverageunit)));
        row.insert("policyterm", Cell::Int(i64::from(record.policyterm)));
        row.insert("prodcode", Cell::Text(record.prodcode.clone()));
        row.insert("issuestate", Cell::Text(record.issuestate.clone()));
        row
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(name, _)| name == column).map(|(_, cell)| cell)
    }

    /// Set a column, replacing an existing value in place or appending.
    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = cell,
            None => self.cells.push((column, cell)),
        }
    }

    pub fn remove(&mut self, column: &str) -> Option<Cell> {
        let idx = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(idx).1)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FormInput, RECORD_COLUMNS};

    #[test]
    fn record_row_keeps_record_column_order() {
        let row = FeatureRow::from_record(&FormInput::default().to_record());
        assert_eq!(row.columns().collect::<Vec<_>>(), RECORD_COLUMNS.to_vec());
        assert_eq!(row.get("coverageunit"), Some(&Cell::Int(96)));
        assert_eq!(row.get("customerdob"), Some(&Cell::Text("1980".to_string())));
    }

    #[test]
    fn schema_matches_record_row() {
        let names: Vec<&str> = RECORD_SCHEMA.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, RECORD_COLUMNS.to_vec());

        let row = FeatureRow::from_record(&FormInput::default().to_record());
        for (name, kind) in RECORD_SCHEMA {
            let numeric = matches!(row.get(name), Some(Cell::Int(_)));
            assert_eq!(numeric, kind == ColumnKind::Numeric, "{name}");
        }
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut row = FeatureRow::new();
        row.insert("a", Cell::Int(1));
        row.insert("b", Cell::Int(2));
        row.insert("a", Cell::Missing);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&Cell::Missing));
        assert_eq!(row.remove("b"), Some(Cell::Int(2)));
        assert_eq!(row.len(), 1);
    }
}
