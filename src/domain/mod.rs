//! Domain types: the categorical tables and the applicant record.

pub mod applicant;
pub mod labels;

pub use applicant::*;
pub use labels::*;
