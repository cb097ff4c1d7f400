//! On-disk pipeline artifact (JSON).
//!
//! The artifact is the portable form of a trained premium model:
//! - which feature transform it was trained behind (name + version)
//! - which record columns it expects
//! - standardized numeric steps and one-hot categorical steps
//! - the linear head (intercept + per-step weights)
//!
//! Structural checks live in `Pipeline::from_artifact`; this module only reads
//! and parses the file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::TransformId;

/// Artifact format understood by this binary.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    pub name: String,
    pub feature_transform: TransformId,
    pub input_columns: Vec<String>,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericStep>,
    #[serde(default)]
    pub categorical: Vec<CategoricalStep>,
    /// Optional floor applied to every prediction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_prediction: Option<f64>,
}

/// `weight * (x - mean) / scale`, with `impute` standing in for missing `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStep {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impute: Option<f64>,
}

/// One-hot encoding folded into the linear head: each known level carries
/// its own weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStep {
    pub column: String,
    pub levels: BTreeMap<String, f64>,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to open model artifact '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported artifact format_version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },
    #[error("artifact requires feature transform {0}, which this build does not provide")]
    UnknownTransform(TransformId),
    #[error("artifact input columns [{found}] do not match the applicant record [{expected}]")]
    InputColumns { expected: String, found: String },
    #[error("step column '{0}' is not produced by the feature transform")]
    UnknownColumn(String),
    #[error("numeric step references text column '{0}'")]
    TextColumn(String),
    #[error("column '{0}' is used by more than one step")]
    DuplicateColumn(String),
    #[error("numeric step '{column}' has invalid scale {scale}")]
    InvalidScale { column: String, scale: f64 },
    #[error("non-finite coefficient in {0}")]
    NonFinite(String),
    #[error("categorical step '{0}' has no levels")]
    EmptyLevels(String),
}

impl PipelineArtifact {
    /// Read and parse an artifact file.
    pub fn read(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse an artifact from an in-memory JSON string.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        serde_json::from_str(json).map_err(|source| ArtifactError::Parse {
            path: PathBuf::from("<memory>"),
            source,
        })
    }
}
