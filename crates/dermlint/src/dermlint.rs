//! Main Dermlint struct and public API.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::identifier::IdentifierColumn;
use crate::input::{MetadataTable, Parser, ParserConfig, SourceMetadata};
use crate::problem::{ColumnProblems, Problem};
use crate::schema::{ArchiveRowSchema, RowSchema};
use crate::store::AccessionStore;
use crate::validate::{check_format_and_existence, check_rows_merged, check_rows_standalone};

/// Configuration for a validation run.
#[derive(Debug, Clone, Default)]
pub struct DermlintConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
}

/// The full report for one uploaded table.
///
/// Two independent outputs, per the caller contract: the flat problem list
/// from the structural stages and the per-column aggregations from the two
/// row-validation modes.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Metadata about the source file, when validated from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// The resolved identifier strategy, absent on structural failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<IdentifierColumn>,
    /// Structural, duplicate, and existence problems, in stage order.
    pub problems: Vec<Problem>,
    /// Standalone row validation, aggregated by (column, message).
    pub row_problems: ColumnProblems,
    /// Merged-mode row validation, aggregated by (column, message).
    pub merged_problems: ColumnProblems,
    /// Counts for quick triage.
    pub summary: ReportSummary,
}

impl ValidationReport {
    /// Whether the upload needs fixing before ingest. Warnings alone do
    /// not count.
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(Problem::is_error)
            || !self.row_problems.is_empty()
            || !self.merged_problems.is_empty()
    }
}

/// Summary counts for a validation report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    /// Rows checked (excluding the header).
    pub rows: usize,
    /// Error-level problems from the structural stages.
    pub errors: usize,
    /// Warning-level problems from the structural stages.
    pub warnings: usize,
    /// Distinct (column, message) failures in standalone mode.
    pub standalone_failure_kinds: usize,
    /// Distinct (column, message) failures in merged mode.
    pub merged_failure_kinds: usize,
    /// Total affected line numbers across both modes.
    pub affected_lines: usize,
}

/// The validation engine: parses an upload and runs the full pipeline
/// against a cohort's stored accessions.
pub struct Dermlint {
    parser: Parser,
    schema: Box<dyn RowSchema>,
}

impl Dermlint {
    /// Create an engine with the default configuration and the built-in
    /// archive row schema.
    pub fn new() -> Self {
        Self::with_config(DermlintConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: DermlintConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            schema: Box::new(ArchiveRowSchema::new()),
        }
    }

    /// Substitute the row schema.
    pub fn with_schema(mut self, schema: impl RowSchema + 'static) -> Self {
        self.schema = Box::new(schema);
        self
    }

    /// Validate a metadata file against a cohort.
    pub fn check_file(
        &self,
        path: impl AsRef<Path>,
        store: &dyn AccessionStore,
        cohort: &str,
    ) -> Result<ValidationReport> {
        let (table, source) = self.parser.parse_file(path)?;
        self.run(&table, Some(source), store, cohort)
    }

    /// Validate an already-parsed table against a cohort.
    pub fn check_table(
        &self,
        table: &MetadataTable,
        store: &dyn AccessionStore,
        cohort: &str,
    ) -> Result<ValidationReport> {
        self.run(table, None, store, cohort)
    }

    fn run(
        &self,
        table: &MetadataTable,
        source: Option<SourceMetadata>,
        store: &dyn AccessionStore,
        cohort: &str,
    ) -> Result<ValidationReport> {
        // Key resolution gates everything else: with an ambiguous or
        // missing key column, no other check is meaningful.
        let identifier = match IdentifierColumn::resolve(table) {
            Ok(identifier) => identifier,
            Err(problem) => {
                return Ok(self.build_report(
                    table,
                    source,
                    None,
                    vec![problem],
                    ColumnProblems::new(),
                    ColumnProblems::new(),
                ));
            }
        };

        let mut problems = check_format_and_existence(table, identifier, store, cohort)?;

        let row_problems = check_rows_standalone(table, self.schema.as_ref());

        let merged = check_rows_merged(table, identifier, store, cohort, self.schema.as_ref())?;
        if !merged.missing.is_empty() {
            problems.push(
                Problem::warning("Rows without a stored accession were skipped during merged validation.")
                    .with_context(merged.missing),
            );
        }

        Ok(self.build_report(
            table,
            source,
            Some(identifier),
            problems,
            row_problems,
            merged.column_problems,
        ))
    }

    fn build_report(
        &self,
        table: &MetadataTable,
        source: Option<SourceMetadata>,
        identifier: Option<IdentifierColumn>,
        problems: Vec<Problem>,
        row_problems: ColumnProblems,
        merged_problems: ColumnProblems,
    ) -> ValidationReport {
        let summary = ReportSummary {
            rows: table.row_count(),
            errors: problems.iter().filter(|p| p.is_error()).count(),
            warnings: problems.iter().filter(|p| !p.is_error()).count(),
            standalone_failure_kinds: row_problems.len(),
            merged_failure_kinds: merged_problems.len(),
            affected_lines: row_problems.affected_lines() + merged_problems.affected_lines(),
        };

        ValidationReport {
            source,
            identifier,
            problems,
            row_problems,
            merged_problems,
            summary,
        }
    }
}

impl Default for Dermlint {
    fn default() -> Self {
        Self::new()
    }
}
