//! The three-stage validation pipeline.
//!
//! Stages run in a fixed order: key resolution
//! ([`IdentifierColumn::resolve`](crate::identifier::IdentifierColumn::resolve)),
//! then [`check_format_and_existence`], then the two row-validation modes.
//! Every stage is exhaustive rather than fail-fast; only a structural key
//! failure short-circuits the run.

mod format;
mod rows;

pub use format::check_format_and_existence;
pub use rows::{check_rows_merged, check_rows_standalone, MergedOutcome};
