//! `premium-quote` library crate.
//!
//! The binary (`premium`) is a thin wrapper around this library so that:
//!
//! - the quote flow is testable without spawning processes or a terminal
//! - the artifact evaluator can be reused by other front-ends

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod features;
pub mod logging;
pub mod models;
pub mod report;
pub mod tui;
