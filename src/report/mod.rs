//! Terminal output formatting.
//!
//! Formatting lives here so the CLI and the TUI print the same strings.

use crate::domain::{ApplicantRecord, Coded, IssueState, MaritalStatus, Product, Sex, SmokingClass};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::models::Pipeline;

/// The success message shown after a submission.
pub fn format_estimate(estimate: f64) -> String {
    format!("Estimated Yearly Policy Price: {estimate:.2}")
}

/// Pretty JSON for the record sent to the model.
pub fn format_record_json(record: &ApplicantRecord) -> Result<String, AppError> {
    serde_json::to_string_pretty(record)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to serialize record: {e}")))
}

/// Every code ↔ label table, in display order.
pub fn format_label_tables() -> String {
    let mut out = String::new();
    push_table::<Sex>(&mut out, "Sex (sex)");
    push_table::<SmokingClass>(&mut out, "Smoking Class (smokingclass)");
    push_table::<MaritalStatus>(&mut out, "Marital Status (maritalstatus)");
    push_table::<Product>(&mut out, "Insurance Product (prodcode)");

    out.push_str("Issue State (issuestate)\n");
    let codes: Vec<&str> = IssueState::ALL.iter().map(|s| s.code()).collect();
    for chunk in codes.chunks(10) {
        out.push_str(&format!("  {}\n", chunk.join(" ")));
    }
    out
}

fn push_table<T: Coded>(out: &mut String, title: &str) {
    out.push_str(title);
    out.push('\n');
    for v in T::ALL {
        out.push_str(&format!("  {:<6} {}\n", v.code(), v.label()));
    }
    out.push('\n');
}

/// Summary of a loaded pipeline for `premium inspect`.
pub fn format_pipeline_summary(pipeline: &Pipeline) -> String {
    let artifact = pipeline.artifact();
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", pipeline.name()));
    out.push_str(&format!("Format: v{}\n", artifact.format_version));
    out.push_str(&format!("Feature transform: {}\n", artifact.feature_transform));
    out.push_str(&format!("Input columns: {}\n", artifact.input_columns.join(", ")));
    out.push_str(&format!("Design width: {}\n", pipeline.design_width()));
    out.push_str(&format!("Intercept: {:.4}\n", artifact.intercept));
    if let Some(floor) = artifact.min_prediction {
        out.push_str(&format!("Floor: {floor:.2}\n"));
    }

    out.push_str("\nNumeric steps:\n");
    for step in &artifact.numeric {
        let impute = step
            .impute
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<14} mean={:>10.3} scale={:>9.3} weight={:>10.3} impute={impute}\n",
            step.column, step.mean, step.scale, step.weight,
        ));
    }

    out.push_str("\nCategorical steps:\n");
    for step in &artifact.categorical {
        out.push_str(&format!("  {:<14} {} levels\n", step.column, step.levels.len()));
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{FormInput, RECORD_COLUMNS};
    use crate::features::FeatureTransform;
    use crate::models::PipelineArtifact;
    use crate::models::artifact::{CategoricalStep, NumericStep};

    fn pipeline() -> Pipeline {
        Pipeline::from_artifact(PipelineArtifact {
            format_version: 1,
            name: "summary-test".to_string(),
            feature_transform: FeatureTransform::ExtractYearOfBirthV1.id(),
            input_columns: RECORD_COLUMNS.iter().map(|c| c.to_string()).collect(),
            intercept: 410.0,
            numeric: vec![
                NumericStep {
                    column: "coverageunit".to_string(),
                    mean: 96.0,
                    scale: 48.0,
                    weight: 120.0,
                    impute: None,
                },
                NumericStep {
                    column: "year_of_birth".to_string(),
                    mean: 1985.0,
                    scale: 15.0,
                    weight: -75.0,
                    impute: Some(1985.0),
                },
            ],
            categorical: vec![CategoricalStep {
                column: "prodcode".to_string(),
                levels: BTreeMap::from([
                    ("A0001".to_string(), 0.0),
                    ("A0002".to_string(), 40.0),
                    ("A0003".to_string(), 25.0),
                ]),
            }],
            min_prediction: Some(25.0),
        })
        .unwrap()
    }

    #[test]
    fn estimate_has_two_decimals() {
        assert_eq!(format_estimate(1234.5), "Estimated Yearly Policy Price: 1234.50");
        assert_eq!(format_estimate(0.006), "Estimated Yearly Policy Price: 0.01");
        assert_eq!(format_estimate(-7.126), "Estimated Yearly Policy Price: -7.13");
    }

    #[test]
    fn label_tables_list_every_entry() {
        let out = format_label_tables();
        assert!(out.contains("A0002  Premium Life Insurance"));
        assert!(out.contains("N      Non-smoker"));
        for state in IssueState::ALL {
            assert!(out.contains(state.code()));
        }
    }

    #[test]
    fn record_json_uses_model_columns() {
        let json = format_record_json(&FormInput::default().to_record()).unwrap();
        assert!(json.contains("\"customerdob\": \"1980\""));
        assert!(json.contains("\"coverageunit\": 96"));
    }

    #[test]
    fn pipeline_summary_describes_artifact() {
        let out = format_pipeline_summary(&pipeline());
        assert!(out.starts_with("=== summary-test ===\n"), "{out}");
        assert!(out.contains("Format: v1\n"));
        assert!(out.contains("Feature transform: extract_year_of_birth@v1\n"));
        assert!(out.contains(&format!("Input columns: {}\n", RECORD_COLUMNS.join(", "))));
        // 2 numerics + 3 product levels
        assert!(out.contains("Design width: 5\n"));
        assert!(out.contains("Intercept: 410.0000\n"));
        assert!(out.contains("Floor: 25.00\n"));
        assert!(out.contains(
            "  coverageunit   mean=    96.000 scale=   48.000 weight=   120.000 impute=-\n"
        ));
        assert!(out.contains(
            "  year_of_birth  mean=  1985.000 scale=   15.000 weight=   -75.000 impute=1985.00\n"
        ));
        assert!(out.contains("  prodcode       3 levels\n"));
    }
}
