//! Command-line parsing for the premium estimator.
//!
//! Argument parsing and command dispatch stay separate from the model code.
//! Settings that describe the deployment (model path, log file) can also come
//! from the environment or a `.env` file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    COVERAGE_UNIT_DEFAULT, FormInput, IssueState, MaritalStatus, POLICY_TERM_DEFAULT, Product, Sex,
    SmokingClass, YEAR_OF_BIRTH_DEFAULT, YEAR_OF_BIRTH_MAX, YEAR_OF_BIRTH_MIN, parse_choice,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "premium", version, about = "Insurance Policy Price Estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive estimator form (default).
    Form(RuntimeArgs),
    /// Price a single applicant and print the estimate.
    Quote(QuoteArgs),
    /// Print the code/label tables used by the form.
    Labels,
    /// Print a summary of the model artifact.
    Inspect(RuntimeArgs),
}

/// Options shared by every command that loads the model.
#[derive(Debug, Args, Clone)]
pub struct RuntimeArgs {
    /// Model artifact (JSON).
    #[arg(long, env = "PREMIUM_MODEL_PATH", default_value = "model.json", value_name = "PATH")]
    pub model: PathBuf,

    /// Append logs to this file (the form never logs to the terminal).
    #[arg(long, env = "PREMIUM_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// A full form submission given as flags.
#[derive(Debug, Args, Clone)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    /// Sex (Male, Female).
    #[arg(long, value_parser = parse_choice::<Sex>, default_value = "Male")]
    pub sex: Sex,

    /// Year of birth.
    #[arg(
        long,
        value_parser = clap::value_parser!(u16).range(i64::from(YEAR_OF_BIRTH_MIN)..=i64::from(YEAR_OF_BIRTH_MAX)),
        default_value_t = YEAR_OF_BIRTH_DEFAULT
    )]
    pub year_of_birth: u16,

    /// Smoking class (Smoker, Non-smoker).
    #[arg(long, value_parser = parse_choice::<SmokingClass>, default_value = "Smoker")]
    pub smoking: SmokingClass,

    /// Marital status (single, married, divorced).
    #[arg(long, value_parser = parse_choice::<MaritalStatus>, default_value = "single")]
    pub marital_status: MaritalStatus,

    /// Coverage unit.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), default_value_t = COVERAGE_UNIT_DEFAULT)]
    pub coverage_unit: u32,

    /// Policy term in years.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), default_value_t = POLICY_TERM_DEFAULT)]
    pub policy_term: u32,

    /// Insurance product (label or code, e.g. "Basic Life Insurance" or A0001).
    #[arg(long, value_parser = parse_choice::<Product>, default_value = "Basic Life Insurance")]
    pub product: Product,

    /// Issue state code (e.g. CA).
    #[arg(long, value_parser = parse_choice::<IssueState>, default_value = "ND")]
    pub issue_state: IssueState,

    /// Also print the record sent to the model (JSON).
    #[arg(long)]
    pub show_record: bool,
}

impl QuoteArgs {
    pub fn form_input(&self) -> FormInput {
        FormInput {
            sex: self.sex,
            year_of_birth: self.year_of_birth,
            smoking: self.smoking,
            marital_status: self.marital_status,
            coverage_unit: self.coverage_unit,
            policy_term: self.policy_term,
            product: self.product,
            issue_state: self.issue_state,
        }
    }
}
