//! The row-schema seam: per-row field validation rules.

mod archive;

pub use archive::ArchiveRowSchema;

use serde::{Deserialize, Serialize};

use crate::input::FieldMap;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field (table column) name.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates one row's field mapping (raw or merged with a stored record).
///
/// `check` is a pure function: an empty result means the row passed, a
/// non-empty one enumerates every failing field. Implementations must
/// tolerate missing and unexpected fields by reporting them as field
/// errors, never by panicking or aborting the row.
pub trait RowSchema {
    /// Validate a field mapping, returning all field-level failures.
    fn check(&self, fields: &FieldMap) -> Vec<FieldError>;
}
