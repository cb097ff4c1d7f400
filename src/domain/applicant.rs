//! Form input and the one-row applicant record sent to the model.

use serde::{Deserialize, Serialize};

use super::labels::{Coded, IssueState, MaritalStatus, Product, Sex, SmokingClass};

/// Year-of-birth bounds enforced by the form widget.
pub const YEAR_OF_BIRTH_MIN: u16 = 1960;
pub const YEAR_OF_BIRTH_MAX: u16 = 2015;
pub const YEAR_OF_BIRTH_DEFAULT: u16 = 1980;

pub const COVERAGE_UNIT_DEFAULT: u32 = 96;
pub const POLICY_TERM_DEFAULT: u32 = 15;

/// Column names of [`ApplicantRecord`], in record order.
pub const RECORD_COLUMNS: [&str; 8] = [
    "sex",
    "customerdob",
    "smokingclass",
    "maritalstatus",
    "coverageunit",
    "policyterm",
    "prodcode",
    "issuestate",
];

/// One form submission, expressed in display terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormInput {
    pub sex: Sex,
    pub year_of_birth: u16,
    pub smoking: SmokingClass,
    pub marital_status: MaritalStatus,
    pub coverage_unit: u32,
    pub policy_term: u32,
    pub product: Product,
    pub issue_state: IssueState,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            sex: Sex::default(),
            year_of_birth: YEAR_OF_BIRTH_DEFAULT,
            smoking: SmokingClass::default(),
            marital_status: MaritalStatus::default(),
            coverage_unit: COVERAGE_UNIT_DEFAULT,
            policy_term: POLICY_TERM_DEFAULT,
            product: Product::default(),
            issue_state: IssueState::default(),
        }
    }
}

impl FormInput {
    /// Translate labels back to codes and build the model record.
    pub fn to_record(&self) -> ApplicantRecord {
        ApplicantRecord {
            sex: self.sex.code().to_string(),
            customerdob: self.year_of_birth.to_string(),
            smokingclass: self.smoking.code().to_string(),
            maritalstatus: self.marital_status.code().to_string(),
            coverageunit: self.coverage_unit,
            policyterm: self.policy_term,
            prodcode: self.product.code().to_string(),
            issuestate: self.issue_state.code().to_string(),
        }
    }
}

/// The one-row tabular record the pipeline predicts on.
///
/// Field names are the model's column names. Categorical fields hold raw
/// codes so a record built outside the form may carry codes the model has
/// never seen; those fail at prediction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub sex: String,
    /// Birth year as a decimal string (e.g. `"1980"`).
    pub customerdob: String,
    pub smokingclass: String,
    pub maritalstatus: String,
    pub coverageunit: u32,
    pub policyterm: u32,
    pub prodcode: String,
    pub issuestate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> FormInput {
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
    fn form_translates_to_model_record() {
        let record = sample_input().to_record();
        assert_eq!(
            record,
            ApplicantRecord {
                sex: "M".to_string(),
                customerdob: "1980".to_string(),
                smokingclass: "N".to_string(),
                maritalstatus: "married".to_string(),
                coverageunit: 96,
                policyterm: 15,
                prodcode: "A0001".to_string(),
                issuestate: "CA".to_string(),
            }
        );
    }

    #[test]
    fn record_serializes_with_model_column_names() {
        let value = serde_json::to_value(sample_input().to_record()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        let mut expected = RECORD_COLUMNS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(obj["customerdob"], "1980");
        assert_eq!(obj["coverageunit"], 96);
    }

    #[test]
    fn year_bounds_produce_same_record_shape() {
        for year in [YEAR_OF_BIRTH_MIN, YEAR_OF_BIRTH_DEFAULT, YEAR_OF_BIRTH_MAX] {
            let input = FormInput {
                year_of_birth: year,
                ..sample_input()
            };
            let record = input.to_record();
            assert_eq!(record.customerdob, year.to_string());
            assert_eq!(record.customerdob.len(), 4);
            assert_eq!(
                ApplicantRecord {
                    customerdob: "1980".to_string(),
                    ..record
                },
                sample_input().to_record()
            );
        }
    }

    #[test]
    fn defaults_match_form_widgets() {
        let input = FormInput::default();
        assert_eq!(input.year_of_birth, 1980);
        assert_eq!(input.coverage_unit, 96);
        assert_eq!(input.policy_term, 15);
        assert_eq!(input.sex, Sex::Male);
    }
}
