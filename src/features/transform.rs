//! Registry of feature transforms a pipeline artifact may declare.
//!
//! Artifacts name the transform they were trained with (`name` + `version`).
//! Loading resolves that id against this closed registry; an id the running
//! binary does not know is rejected at load time, never at prediction time.

use serde::{Deserialize, Serialize};

use super::{ColumnKind, FeatureRow, TransformError, year_of_birth};

/// Transform identifier as written in an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformId {
    pub name: String,
    pub version: u32,
}

impl std::fmt::Display for TransformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@v{}", self.name, self.version)
    }
}

/// Transforms compiled into this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTransform {
    /// `customerdob` → `year_of_birth`.
    ExtractYearOfBirthV1,
}

impl FeatureTransform {
    pub const ALL: [FeatureTransform; 1] = [FeatureTransform::ExtractYearOfBirthV1];

    pub fn name(self) -> &'static str {
        match self {
            FeatureTransform::ExtractYearOfBirthV1 => "extract_year_of_birth",
        }
    }

    pub fn version(self) -> u32 {
        match self {
            FeatureTransform::ExtractYearOfBirthV1 => 1,
        }
    }

    pub fn id(self) -> TransformId {
        TransformId {
            name: self.name().to_string(),
            version: self.version(),
        }
    }

    /// Look up a transform by exact name and version.
    pub fn resolve(id: &TransformId) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == id.name && t.version() == id.version)
    }

    pub fn apply(self, row: FeatureRow) -> Result<FeatureRow, TransformError> {
        match self {
            FeatureTransform::ExtractYearOfBirthV1 => year_of_birth::extract_year_of_birth(row),
        }
    }

    /// Columns (and their kinds) after applying the transform to rows with
    /// the `input` columns.
    pub fn output_columns<'a>(
        self,
        input: impl IntoIterator<Item = (&'a str, ColumnKind)>,
    ) -> Vec<(String, ColumnKind)> {
        match self {
            FeatureTransform::ExtractYearOfBirthV1 => {
                let mut out: Vec<(String, ColumnKind)> = input
                    .into_iter()
                    .filter(|(c, _)| *c != year_of_birth::SOURCE_COLUMN)
                    .map(|(c, kind)| (c.to_string(), kind))
                    .collect();
                out.push((year_of_birth::OUTPUT_COLUMN.to_string(), ColumnKind::Numeric));
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormInput;
    use crate::features::{Cell, RECORD_SCHEMA};

    #[test]
    fn resolve_requires_matching_version() {
        let id = FeatureTransform::ExtractYearOfBirthV1.id();
        assert_eq!(id.to_string(), "extract_year_of_birth@v1");
        assert_eq!(FeatureTransform::resolve(&id), Some(FeatureTransform::ExtractYearOfBirthV1));

        let newer = TransformId {
            version: 2,
            ..id.clone()
        };
        assert_eq!(FeatureTransform::resolve(&newer), None);

        let renamed = TransformId {
            name: "extract_age".to_string(),
            version: 1,
        };
        assert_eq!(FeatureTransform::resolve(&renamed), None);
    }

    #[test]
    fn declared_output_columns_match_applied_row() {
        let t = FeatureTransform::ExtractYearOfBirthV1;
        let row = FeatureRow::from_record(&FormInput::default().to_record());
        let applied = t.apply(row).unwrap();
        let declared = t.output_columns(RECORD_SCHEMA);
        let names: Vec<&str> = declared.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(applied.columns().collect::<Vec<_>>(), names);

        for (column, kind) in &declared {
            let numeric = matches!(applied.get(column), Some(Cell::Int(_)));
            assert_eq!(numeric, *kind == ColumnKind::Numeric, "{column}");
        }
    }
}
