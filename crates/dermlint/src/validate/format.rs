//! Structural checks on the key column: duplicates, missing values, and
//! existence against the store.

use std::collections::{BTreeSet, HashSet};

use crate::error::{DermlintError, Result};
use crate::identifier::IdentifierColumn;
use crate::input::MetadataTable;
use crate::problem::Problem;
use crate::store::AccessionStore;

/// Validate the table's key column against itself and the store.
///
/// Purely structural: non-key fields are never inspected, and malformed
/// data is reported, never raised. Emits up to three problems:
///
/// - an error listing rows whose key cell is empty;
/// - an error listing duplicated key values, once each, in order of first
///   duplicate occurrence;
/// - a warning listing key values with no stored accession in the cohort
///   (unique, sorted).
///
/// The existence check is one bulk query regardless of row count.
pub fn check_format_and_existence(
    table: &MetadataTable,
    identifier: IdentifierColumn,
    store: &dyn AccessionStore,
    cohort: &str,
) -> Result<Vec<Problem>> {
    let col = table
        .column_index(identifier.column())
        .ok_or_else(|| DermlintError::MissingColumn(identifier.column().to_string()))?;

    let mut problems = Vec::new();
    let keys = table.key_values(col);

    let missing_lines: Vec<usize> = keys
        .iter()
        .enumerate()
        .filter(|(_, k)| k.is_none())
        .map(|(i, _)| table.line_number(i))
        .collect();
    if !missing_lines.is_empty() {
        problems.push(
            Problem::error(format!("Missing {} values.", identifier.column()))
                .with_context(missing_lines),
        );
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for key in keys.iter().flatten() {
        let key = key.as_str();
        if !seen.insert(key) && !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }
    if !duplicates.is_empty() {
        problems.push(
            Problem::error(format!("Duplicate {}s found.", identifier.column()))
                .with_context(duplicates),
        );
    }

    let present: Vec<String> = keys.into_iter().flatten().collect();
    let found = store.existing_keys(cohort, identifier, &present)?;
    let unknown: BTreeSet<&str> = present
        .iter()
        .map(|k| k.as_str())
        .filter(|k| !found.contains(*k))
        .collect();
    if !unknown.is_empty() {
        problems.push(
            Problem::warning("Encountered unknown images in the CSV.").with_context(unknown),
        );
    }

    Ok(problems)
}
