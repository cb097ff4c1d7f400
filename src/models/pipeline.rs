//! Compiled prediction pipeline.
//!
//! `Pipeline` is built once from a validated [`PipelineArtifact`] and is
//! read-only afterwards. Prediction for one record:
//!
//! 1. record → raw [`FeatureRow`]
//! 2. apply the declared feature transform
//! 3. encode into a design row (standardized numerics, then one-hot levels)
//! 4. `intercept + weights · x`, floored at `min_prediction` when set

use std::collections::{HashMap, HashSet};
use std::path::Path;

use nalgebra::DVector;
use thiserror::Error;

use crate::domain::{ApplicantRecord, RECORD_COLUMNS};
use crate::features::{Cell, ColumnKind, FeatureRow, FeatureTransform, RECORD_SCHEMA, TransformError};

use super::PremiumModel;
use super::artifact::{ArtifactError, CategoricalStep, FORMAT_VERSION, NumericStep, PipelineArtifact};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("column '{0}' is missing after the feature transform")]
    MissingColumn(String),
    #[error("column '{column}' has no value and the model has no imputation for it")]
    MissingValue { column: String },
    #[error("column '{column}' received unknown category '{value}'")]
    UnknownCategory { column: String, value: String },
    #[error("column '{column}' expected a {expected} value, got '{found}'")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: String,
    },
    #[error("model produced a non-finite prediction")]
    NonFinite,
    #[error("model returned no prediction")]
    NoOutput,
}

/// A categorical step with its level order fixed and its slot in the design row.
#[derive(Debug, Clone)]
struct EncodedCategorical {
    column: String,
    levels: Vec<String>,
    offset: usize,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    artifact: PipelineArtifact,
    transform: FeatureTransform,
    categorical: Vec<EncodedCategorical>,
    weights: DVector<f64>,
}

impl Pipeline {
    /// Read, validate, and compile an artifact file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        Self::from_artifact(PipelineArtifact::read(path)?)
    }

    /// Validate and compile a parsed artifact.
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, ArtifactError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedFormat {
                found: artifact.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let transform = FeatureTransform::resolve(&artifact.feature_transform)
            .ok_or_else(|| ArtifactError::UnknownTransform(artifact.feature_transform.clone()))?;

        check_input_columns(&artifact.input_columns)?;

        let produced: HashMap<String, ColumnKind> = transform.output_columns(RECORD_SCHEMA).into_iter().collect();
        let mut used: HashSet<&str> = HashSet::new();
        // Numeric steps need numeric cells; categorical steps accept either kind.
        let step_columns = artifact
            .numeric
            .iter()
            .map(|s| (s.column.as_str(), true))
            .chain(artifact.categorical.iter().map(|s| (s.column.as_str(), false)));
        for (column, numeric) in step_columns {
            let Some(kind) = produced.get(column) else {
                return Err(ArtifactError::UnknownColumn(column.to_string()));
            };
            if numeric && *kind != ColumnKind::Numeric {
                return Err(ArtifactError::TextColumn(column.to_string()));
            }
            if !used.insert(column) {
                return Err(ArtifactError::DuplicateColumn(column.to_string()));
            }
        }

        if !artifact.intercept.is_finite() {
            return Err(ArtifactError::NonFinite("intercept".to_string()));
        }
        if artifact.min_prediction.is_some_and(|v| !v.is_finite()) {
            return Err(ArtifactError::NonFinite("min_prediction".to_string()));
        }
        for step in &artifact.numeric {
            check_numeric(step)?;
        }
        for step in &artifact.categorical {
            check_categorical(step)?;
        }

        // Design row layout: numerics first, then each categorical's levels.
        let mut weights: Vec<f64> = artifact.numeric.iter().map(|s| s.weight).collect();
        let mut categorical = Vec::with_capacity(artifact.categorical.len());
        for step in &artifact.categorical {
            let offset = weights.len();
            let mut levels = Vec::with_capacity(step.levels.len());
            for (level, weight) in &step.levels {
                levels.push(level.clone());
                weights.push(*weight);
            }
            categorical.push(EncodedCategorical {
                column: step.column.clone(),
                levels,
                offset,
            });
        }

        Ok(Self {
            artifact,
            transform,
            categorical,
            weights: DVector::from_vec(weights),
        })
    }

    pub fn name(&self) -> &str {
        &self.artifact.name
    }

    pub fn transform(&self) -> FeatureTransform {
        self.transform
    }

    pub fn artifact(&self) -> &PipelineArtifact {
        &self.artifact
    }

    /// Width of the encoded design row.
    pub fn design_width(&self) -> usize {
        self.weights.len()
    }

    /// Predict a single record.
    pub fn predict_one(&self, record: &ApplicantRecord) -> Result<f64, PredictError> {
        let row = self.transform.apply(FeatureRow::from_record(record))?;
        let x = self.encode(&row)?;

        let y = self.artifact.intercept + self.weights.dot(&x);
        // `f64::max` swallows NaN, so check before flooring.
        if !y.is_finite() {
            return Err(PredictError::NonFinite);
        }
        Ok(match self.artifact.min_prediction {
            Some(floor) => y.max(floor),
            None => y,
        })
    }

    /// Encode a transformed row into the design vector.
    fn encode(&self, row: &FeatureRow) -> Result<DVector<f64>, PredictError> {
        let mut x = DVector::zeros(self.weights.len());

        for (i, step) in self.artifact.numeric.iter().enumerate() {
            let cell = lookup(row, &step.column)?;
            let value = match cell {
                Cell::Int(v) => *v as f64,
                Cell::Missing => step.impute.ok_or_else(|| PredictError::MissingValue {
                    column: step.column.clone(),
                })?,
                Cell::Text(s) => {
                    return Err(PredictError::ColumnType {
                        column: step.column.clone(),
                        expected: "numeric",
                        found: s.clone(),
                    });
                }
            };
            x[i] = (value - step.mean) / step.scale;
        }

        for step in &self.categorical {
            let value = match lookup(row, &step.column)? {
                Cell::Text(s) => s.clone(),
                Cell::Int(v) => v.to_string(),
                Cell::Missing => {
                    return Err(PredictError::MissingValue {
                        column: step.column.clone(),
                    });
                }
            };
            let idx = step
                .levels
                .iter()
                .position(|level| *level == value)
                .ok_or_else(|| PredictError::UnknownCategory {
                    column: step.column.clone(),
                    value,
                })?;
            x[step.offset + idx] = 1.0;
        }

        Ok(x)
    }
}

impl PremiumModel for Pipeline {
    fn predict(&self, records: &[ApplicantRecord]) -> Result<Vec<f64>, PredictError> {
        records.iter().map(|r| self.predict_one(r)).collect()
    }
}

fn lookup<'a>(row: &'a FeatureRow, column: &str) -> Result<&'a Cell, PredictError> {
    row.get(column)
        .ok_or_else(|| PredictError::MissingColumn(column.to_string()))
}

fn check_input_columns(found: &[String]) -> Result<(), ArtifactError> {
    let mut found_sorted: Vec<&str> = found.iter().map(String::as_str).collect();
    let mut expected_sorted: Vec<&str> = RECORD_COLUMNS.to_vec();
    found_sorted.sort_unstable();
    expected_sorted.sort_unstable();
    if found_sorted != expected_sorted {
        return Err(ArtifactError::InputColumns {
            expected: RECORD_COLUMNS.join(", "),
            found: found.join(", "),
        });
    }
    Ok(())
}

fn check_numeric(step: &NumericStep) -> Result<(), ArtifactError> {
    if !step.scale.is_finite() || step.scale == 0.0 {
        return Err(ArtifactError::InvalidScale {
            column: step.column.clone(),
            scale: step.scale,
        });
    }
    let finite = step.mean.is_finite()
        && step.weight.is_finite()
        && step.impute.is_none_or(|v| v.is_finite());
    if !finite {
        return Err(ArtifactError::NonFinite(format!("numeric step '{}'", step.column)));
    }
    Ok(())
}

fn check_categorical(step: &CategoricalStep) -> Result<(), ArtifactError> {
    if step.levels.is_empty() {
        return Err(ArtifactError::EmptyLevels(step.column.clone()));
    }
    if step.levels.values().any(|w| !w.is_finite()) {
        return Err(ArtifactError::NonFinite(format!("categorical step '{}'", step.column)));
    }
    Ok(())
}
