//! Dermlint: batch metadata validation for skin-image archive uploads.
//!
//! A curator uploads a CSV describing images in an archive cohort. Dermlint
//! validates it in three stages and reports *everything* wrong in one pass
//! rather than failing on the first issue:
//!
//! 1. **Key resolution** — exactly one of the `isic_id` or `filename`
//!    columns must identify rows; both or neither is a terminal structural
//!    problem.
//! 2. **Format & existence** — duplicate keys within the file and keys with
//!    no stored accession in the cohort.
//! 3. **Row validation** — every row checked against the row schema, both
//!    standalone and merged over the previously stored metadata for its
//!    image, with failures aggregated by (column, message).
//!
//! # Example
//!
//! ```no_run
//! use dermlint::{Dermlint, InMemoryStore};
//!
//! let store = InMemoryStore::from_snapshot_file("cohorts.json").unwrap();
//! let report = Dermlint::new()
//!     .check_file("metadata.csv", &store, "msk-2024")
//!     .unwrap();
//!
//! for problem in &report.problems {
//!     println!("{}: {}", problem.kind.label(), problem.message);
//! }
//! for (column, message, lines) in report.row_problems.iter() {
//!     println!("{column}: {message} (rows {lines:?})");
//! }
//! ```

pub mod error;
pub mod identifier;
pub mod input;
pub mod problem;
pub mod schema;
pub mod store;
pub mod validate;

mod dermlint;

pub use crate::dermlint::{Dermlint, DermlintConfig, ReportSummary, ValidationReport};
pub use error::{DermlintError, Result};
pub use identifier::IdentifierColumn;
pub use input::{FieldMap, MetadataTable, Parser, ParserConfig, SourceMetadata};
pub use problem::{ColumnProblemEntry, ColumnProblems, Problem, ProblemKind};
pub use schema::{ArchiveRowSchema, FieldError, RowSchema};
pub use store::{AccessionRecord, AccessionStore, InMemoryStore};
pub use validate::{check_format_and_existence, check_rows_merged, check_rows_standalone, MergedOutcome};
