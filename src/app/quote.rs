//! Shared quote flow used by both the CLI and the TUI.
//!
//! form labels -> codes -> one-row record -> model -> formatted estimate
//!
//! The front-ends only differ in how they collect the form and where they
//! show the message.

use std::path::Path;

use crate::domain::{ApplicantRecord, FormInput, YEAR_OF_BIRTH_MAX, YEAR_OF_BIRTH_MIN};
use crate::error::AppError;
use crate::models::{Pipeline, PredictError, PremiumModel};

/// Result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub record: ApplicantRecord,
    pub estimate: f64,
    pub message: String,
}

/// Load the pipeline once at startup. Any failure here is fatal.
pub fn load_pipeline(path: &Path) -> Result<Pipeline, AppError> {
    let pipeline = Pipeline::load(path)?;
    tracing::info!(
        path = %path.display(),
        name = pipeline.name(),
        transform = %pipeline.transform().id(),
        width = pipeline.design_width(),
        "loaded model artifact"
    );
    Ok(pipeline)
}

/// Translate, predict, and format a single submission.
pub fn submit<M: PremiumModel + ?Sized>(model: &M, input: &FormInput) -> Result<Quote, PredictError> {
    let record = input.to_record();
    tracing::debug!(?record, "submitting applicant record");

    let estimate = match model.predict(std::slice::from_ref(&record)) {
        Ok(out) => out.into_iter().next().ok_or(PredictError::NoOutput)?,
        Err(err) => {
            tracing::warn!(error = %err, "prediction failed");
            return Err(err);
        }
    };

    let message = crate::report::format_estimate(estimate);
    tracing::info!(estimate, "quote computed");
    Ok(Quote {
        record,
        estimate,
        message,
    })
}

/// Estimate across the whole year-of-birth range with the other fields fixed.
///
/// Years the model cannot price are skipped.
pub fn premium_by_birth_year<M: PremiumModel + ?Sized>(model: &M, input: &FormInput) -> Vec<(f64, f64)> {
    let years: Vec<u16> = (YEAR_OF_BIRTH_MIN..=YEAR_OF_BIRTH_MAX).collect();
    let records: Vec<ApplicantRecord> = years
        .iter()
        .map(|&year| {
            FormInput {
                year_of_birth: year,
                ..*input
            }
            .to_record()
        })
        .collect();

    match model.predict(&records) {
        Ok(values) => years
            .iter()
            .zip(values)
            .filter(|(_, v)| v.is_finite())
            .map(|(&year, v)| (f64::from(year), v))
            .collect(),
        Err(err) => {
            tracing::debug!(error = %err, "curve prediction failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::domain::{IssueState, MaritalStatus, Product, Sex, SmokingClass};

    /// Records every batch and prices each record by its coverage unit.
    #[derive(Default)]
    struct RecordingModel {
        seen: RefCell<Vec<ApplicantRecord>>,
    }

    impl PremiumModel for RecordingModel {
        fn predict(&self, records: &[ApplicantRecord]) -> Result<Vec<f64>, PredictError> {
            self.seen.borrow_mut().extend_from_slice(records);
            Ok(records
                .iter()
                .map(|r| f64::from(r.coverageunit) * 10.0 + 0.25)
                .collect())
        }
    }

    struct EmptyModel;

    impl PremiumModel for EmptyModel {
        fn predict(&self, _records: &[ApplicantRecord]) -> Result<Vec<f64>, PredictError> {
            Ok(Vec::new())
        }
    }

    fn scenario() -> FormInput {
        FormInput {
            sex: Sex::Male,
            year_of_birth: 1980,
            smoking: SmokingClass::NonSmoker,
            marital_status: MaritalStatus::Married,
            coverage_unit: 96,
            policy_term: 15,
            product: Product::BasicLife,
            issue_state: IssueState::Ca,
        }
    }

    #[test]
    fn submit_sends_translated_record_and_formats_result() {
        let model = RecordingModel::default();
        let quote = submit(&model, &scenario()).unwrap();

        let seen = model.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].sex, "M");
        assert_eq!(seen[0].customerdob, "1980");
        assert_eq!(seen[0].smokingclass, "N");
        assert_eq!(seen[0].maritalstatus, "married");
        assert_eq!(seen[0].prodcode, "A0001");
        assert_eq!(seen[0].issuestate, "CA");
        assert_eq!(quote.record, seen[0]);

        assert_eq!(quote.estimate, 960.25);
        assert_eq!(quote.message, "Estimated Yearly Policy Price: 960.25");
    }

    #[test]
    fn identical_submissions_give_identical_output() {
        let model = RecordingModel::default();
        let a = submit(&model, &scenario()).unwrap();
        let b = submit(&model, &scenario()).unwrap();
        assert_eq!(a.message, b.message);
    }

    #[test]
    fn empty_model_output_is_an_error() {
        assert_eq!(submit(&EmptyModel, &scenario()), Err(PredictError::NoOutput));
    }

    #[test]
    fn curve_covers_form_year_range() {
        let model = RecordingModel::default();
        let curve = premium_by_birth_year(&model, &scenario());
        assert_eq!(curve.len(), usize::from(YEAR_OF_BIRTH_MAX - YEAR_OF_BIRTH_MIN) + 1);
        assert_eq!(curve.first().map(|p| p.0), Some(1960.0));
        assert_eq!(curve.last().map(|p| p.0), Some(2015.0));
        assert!(model.seen.borrow().iter().all(|r| r.coverageunit == 96));
    }
}
