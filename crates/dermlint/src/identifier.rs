//! Key resolution: which column associates rows with stored accessions.

use serde::{Deserialize, Serialize};

use crate::input::MetadataTable;
use crate::problem::Problem;

/// The identifier strategy for an uploaded table.
///
/// A table must carry exactly one of the two key columns; the variant pins
/// both the table column to read and the accession field to query, so no
/// third, invalid strategy can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierColumn {
    /// Rows are keyed by ISIC ID.
    IsicId,
    /// Rows are keyed by the originally uploaded file name.
    Filename,
}

impl IdentifierColumn {
    /// The table column holding the key.
    pub const fn column(&self) -> &'static str {
        match self {
            IdentifierColumn::IsicId => "isic_id",
            IdentifierColumn::Filename => "filename",
        }
    }

    /// The accession field the key is matched against in the store.
    pub const fn record_field(&self) -> &'static str {
        match self {
            IdentifierColumn::IsicId => "isic_id",
            IdentifierColumn::Filename => "original_blob_name",
        }
    }

    /// Decide the strategy from the table's column set.
    ///
    /// Having both or neither key column is a structural failure: the
    /// returned [`Problem`] is terminal and no further validation of the
    /// table is meaningful.
    pub fn resolve(table: &MetadataTable) -> Result<IdentifierColumn, Problem> {
        let has_isic_id = table.has_column(IdentifierColumn::IsicId.column());
        let has_filename = table.has_column(IdentifierColumn::Filename.column());

        match (has_isic_id, has_filename) {
            (true, true) => Err(Problem::error(
                "Cannot provide both isic_id and filename columns.",
            )),
            (false, false) => Err(Problem::error(
                "Must provide either isic_id or filename column.",
            )),
            (true, false) => Ok(IdentifierColumn::IsicId),
            (false, true) => Ok(IdentifierColumn::Filename),
        }
    }
}

impl std::fmt::Display for IdentifierColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}
