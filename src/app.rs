//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - loads the model artifact once
//! - dispatches to the form, a one-shot quote, or an info command

use clap::Parser;

use crate::cli::{Command, QuoteArgs, RuntimeArgs};
use crate::error::AppError;
use crate::logging::{self, LogTarget};

pub mod quote;

/// Entry point for the `premium` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` supplies PREMIUM_MODEL_PATH / PREMIUM_LOG_FILE defaults.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Form(args) => handle_form(args),
        Command::Quote(args) => handle_quote(args),
        Command::Labels => {
            print!("{}", crate::report::format_label_tables());
            Ok(())
        }
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn handle_form(args: RuntimeArgs) -> Result<(), AppError> {
    logging::init(LogTarget::for_tui(args.log_file.as_deref()))?;
    let pipeline = quote::load_pipeline(&args.model)?;
    crate::tui::run(pipeline)
}

fn handle_quote(args: QuoteArgs) -> Result<(), AppError> {
    logging::init(LogTarget::for_cli(args.runtime.log_file.as_deref()))?;
    let pipeline = quote::load_pipeline(&args.runtime.model)?;

    let result = quote::submit(&pipeline, &args.form_input())?;
    if args.show_record {
        println!("{}", crate::report::format_record_json(&result.record)?);
    }
    println!("{}", result.message);
    Ok(())
}

fn handle_inspect(args: RuntimeArgs) -> Result<(), AppError> {
    logging::init(LogTarget::for_cli(args.log_file.as_deref()))?;
    let pipeline = quote::load_pipeline(&args.model)?;
    print!("{}", crate::report::format_pipeline_summary(&pipeline));
    Ok(())
}

/// Rewrite argv so `premium` defaults to `premium form`.
///
/// Rules:
/// - `premium`                      -> `premium form`
/// - `premium --model m.json ...`   -> `premium form --model m.json ...`
/// - `premium --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("form".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "form" | "quote" | "labels" | "inspect");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "form flags".
    if arg1.starts_with('-') {
        argv.insert(1, "form".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_form() {
        assert_eq!(rewrite_args(argv(&["premium"])), argv(&["premium", "form"]));
        assert_eq!(
            rewrite_args(argv(&["premium", "--model", "m.json"])),
            argv(&["premium", "form", "--model", "m.json"])
        );
    }

    #[test]
    fn explicit_commands_and_help_are_untouched() {
        for args in [
            argv(&["premium", "quote", "--sex", "Male"]),
            argv(&["premium", "labels"]),
            argv(&["premium", "--help"]),
            argv(&["premium", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }
}
