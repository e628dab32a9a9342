//! Problem types produced by the validation pipeline.
//!
//! Validation never fails fast: every stage appends to a growing list of
//! [`Problem`]s or to a [`ColumnProblems`] aggregation so a curator can fix
//! an entire upload in one pass.

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Severity of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    /// Definite issue that must be fixed before ingest.
    Error,
    /// Potential issue that should be reviewed.
    Warning,
}

impl ProblemKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ProblemKind::Error => "Error",
            ProblemKind::Warning => "Warning",
        }
    }
}

impl Default for ProblemKind {
    fn default() -> Self {
        ProblemKind::Error
    }
}

/// A single table-level problem (structural, duplicate, or existence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Human-readable description.
    pub message: String,
    /// Offending values (duplicated keys, unknown keys, skipped keys).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<Value>,
    /// Severity, defaults to error.
    #[serde(rename = "type", default)]
    pub kind: ProblemKind,
}

impl Problem {
    /// Create an error-level problem.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            kind: ProblemKind::Error,
        }
    }

    /// Create a warning-level problem.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            kind: ProblemKind::Warning,
        }
    }

    /// Attach offending values.
    pub fn with_context(mut self, context: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.context = context.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this problem is error-level.
    pub fn is_error(&self) -> bool {
        self.kind == ProblemKind::Error
    }
}

/// One entry of the per-column aggregation, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProblemEntry {
    /// Affected column name.
    pub column: String,
    /// Validation message for that column.
    pub message: String,
    /// 1-based file line numbers where the failure occurred (line 1 is the
    /// header, so data rows start at 2).
    pub lines: Vec<usize>,
}

/// Row-validation failures aggregated by (column, message).
///
/// The same failure on many rows collapses into one entry holding every
/// affected line number, keeping output proportional to distinct failure
/// kinds rather than row count. Entries keep first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnProblems {
    entries: IndexMap<(String, String), Vec<usize>>,
}

impl ColumnProblems {
    /// Create an empty aggregation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line number to the entry for (column, message), creating the
    /// entry on first occurrence.
    pub fn record(&mut self, column: impl Into<String>, message: impl Into<String>, line: usize) {
        self.entries
            .entry((column.into(), message.into()))
            .or_default()
            .push(line);
    }

    /// Absorb another aggregation. Line lists are concatenated then sorted,
    /// so merging partial results is order-independent.
    pub fn merge(&mut self, other: ColumnProblems) {
        for ((column, message), lines) in other.entries {
            let entry = self.entries.entry((column, message)).or_default();
            entry.extend(lines);
            entry.sort_unstable();
        }
    }

    /// Lines recorded for a (column, message) pair, if any.
    pub fn get(&self, column: &str, message: &str) -> Option<&[usize]> {
        self.entries
            .get(&(column.to_string(), message.to_string()))
            .map(|v| v.as_slice())
    }

    /// Number of distinct (column, message) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of affected line numbers across all entries.
    pub fn affected_lines(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }

    /// Iterate entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[usize])> {
        self.entries
            .iter()
            .map(|((c, m), lines)| (c.as_str(), m.as_str(), lines.as_slice()))
    }

    /// Convert to serializable entries.
    pub fn to_entries(&self) -> Vec<ColumnProblemEntry> {
        self.entries
            .iter()
            .map(|((column, message), lines)| ColumnProblemEntry {
                column: column.clone(),
                message: message.clone(),
                lines: lines.clone(),
            })
            .collect()
    }
}

impl Serialize for ColumnProblems {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in self.to_entries() {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}
