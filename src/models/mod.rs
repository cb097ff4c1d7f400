//! Premium models: the artifact format and the compiled pipeline.

use crate::domain::ApplicantRecord;

pub mod artifact;
pub mod pipeline;

pub use artifact::{ArtifactError, PipelineArtifact};
pub use pipeline::{Pipeline, PredictError};

/// Anything that can price a batch of applicant records.
///
/// Returns one estimate per record, in input order.
pub trait PremiumModel {
    fn predict(&self, records: &[ApplicantRecord]) -> Result<Vec<f64>, PredictError>;
}
