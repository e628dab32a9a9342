//! In-memory representation of an uploaded metadata table.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row or merged-record field mapping, as handed to the row schema.
pub type FieldMap = serde_json::Map<String, Value>;

/// Metadata about the uploaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }
}

/// Parsed tabular metadata: ordered headers plus typed cells.
///
/// Cells are scalars (string, number, boolean) or null. Row order matters
/// only for line numbering in problem reports: line 1 is the header, so the
/// row at index `i` is file line `i + 2`.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order), one cell per header.
    pub rows: Vec<Vec<Value>>,
}

impl MetadataTable {
    /// Create a new table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether a column is present.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// The file line number of the row at index `i`.
    pub fn line_number(&self, i: usize) -> usize {
        i + 2
    }

    /// Key values for a column, one per row, `None` where the cell is null.
    ///
    /// Non-string scalars are stringified so numeric-looking keys still
    /// match the store.
    pub fn key_values(&self, col: usize) -> Vec<Option<String>> {
        self.rows
            .iter()
            .map(|row| row.get(col).and_then(value_to_key))
            .collect()
    }

    /// The row at index `i` as a field mapping, nulls included.
    pub fn row_fields(&self, i: usize) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(row) = self.rows.get(i) {
            for (header, value) in self.headers.iter().zip(row) {
                fields.insert(header.clone(), value.clone());
            }
        }
        fields
    }

    /// Check if a raw cell token represents a missing/null value.
    pub fn is_null_token(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

/// Stringify a scalar cell for use as a lookup key.
fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Arrays/objects never appear in parsed CSV cells.
        other => Some(other.to_string()),
    }
}
