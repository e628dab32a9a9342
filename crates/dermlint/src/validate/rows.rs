//! Row validation in standalone and merged modes.
//!
//! Both modes share the aggregation contract: every schema failure appends
//! the row's line number to the [`ColumnProblems`] entry for that
//! (column, message) pair, so output scales with distinct failure kinds
//! rather than row count.

use serde_json::Value;

use crate::error::{DermlintError, Result};
use crate::identifier::IdentifierColumn;
use crate::input::MetadataTable;
use crate::problem::ColumnProblems;
use crate::schema::RowSchema;
use crate::store::AccessionStore;

/// Validate every row in isolation against the row schema.
///
/// Rows are numbered from line 2 (line 1 is the header). Passing rows
/// contribute nothing; a failing row never aborts the rest.
pub fn check_rows_standalone(table: &MetadataTable, schema: &dyn RowSchema) -> ColumnProblems {
    let mut problems = ColumnProblems::new();

    for i in 0..table.row_count() {
        let line = table.line_number(i);
        for error in schema.check(&table.row_fields(i)) {
            problems.record(error.field, error.message, line);
        }
    }

    problems
}

/// Result of merged-mode validation.
#[derive(Debug, Clone, Default)]
pub struct MergedOutcome {
    /// Schema failures aggregated by (column, message), keyed to the row's
    /// line number.
    pub column_problems: ColumnProblems,
    /// Key values whose rows were skipped because no stored accession was
    /// found, unique, in first-seen order. Never silently empty-merged.
    pub missing: Vec<String>,
}

/// Validate every row overlaid onto its stored accession metadata.
///
/// Stored records are bulk-fetched once. Per row, the stored metadata is
/// the base and every non-null row field overwrites it; null row values
/// never erase stored values. The merged mapping then goes through the same
/// schema as standalone mode. Rows whose key has no stored record (or no
/// key at all) are skipped and surfaced via [`MergedOutcome::missing`].
pub fn check_rows_merged(
    table: &MetadataTable,
    identifier: IdentifierColumn,
    store: &dyn AccessionStore,
    cohort: &str,
    schema: &dyn RowSchema,
) -> Result<MergedOutcome> {
    let col = table
        .column_index(identifier.column())
        .ok_or_else(|| DermlintError::MissingColumn(identifier.column().to_string()))?;

    let keys = table.key_values(col);
    let present: Vec<String> = keys.iter().flatten().cloned().collect();
    let stored = store.fetch_metadata(cohort, identifier, &present)?;

    let mut outcome = MergedOutcome::default();

    for (i, key) in keys.iter().enumerate() {
        let base = key.as_ref().and_then(|k| stored.get(k));
        let Some(base) = base else {
            if let Some(k) = key {
                if !outcome.missing.contains(k) {
                    outcome.missing.push(k.clone());
                }
            }
            continue;
        };

        let mut merged = base.clone();
        for (field, value) in table.row_fields(i) {
            if !matches!(value, Value::Null) {
                merged.insert(field, value);
            }
        }

        let line = table.line_number(i);
        for error in schema.check(&merged) {
            outcome.column_problems.record(error.field, error.message, line);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FieldMap;
    use crate::schema::FieldError;
    use crate::store::{AccessionRecord, InMemoryStore};
    use serde_json::json;

    const COHORT: &str = "cohort-a";

    /// Schema for tests: `age` must be a non-negative integer and `sex`
    /// must be present once merged.
    struct StubSchema;

    impl RowSchema for StubSchema {
        fn check(&self, fields: &FieldMap) -> Vec<FieldError> {
            let mut errors = Vec::new();
            match fields.get("age") {
                Some(v) if v.as_i64().is_some_and(|a| a >= 0) => {}
                _ => errors.push(FieldError::new("age", "must be a non-negative integer")),
            }
            if !fields.get("sex").is_some_and(|v| !v.is_null()) {
                errors.push(FieldError::new("sex", "is required"));
            }
            errors
        }
    }

    fn table(rows: &[(&str, Value, Value)]) -> MetadataTable {
        MetadataTable::new(
            vec!["filename".into(), "age".into(), "sex".into()],
            rows.iter()
                .map(|(f, a, s)| vec![json!(f), a.clone(), s.clone()])
                .collect(),
        )
    }

    fn store_with(records: &[(&str, FieldMap)]) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for (blob, metadata) in records {
            store.insert(
                COHORT,
                AccessionRecord {
                    isic_id: None,
                    original_blob_name: blob.to_string(),
                    metadata: metadata.clone(),
                },
            );
        }
        store
    }

    fn metadata(pairs: &[(&str, Value)]) -> FieldMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_standalone_aggregates_by_column_and_message() {
        let table = table(&[
            ("a.jpg", json!(-1), json!("male")),
            ("b.jpg", json!(30), json!("female")),
            ("c.jpg", json!(-2), json!("male")),
        ]);
        let problems = check_rows_standalone(&table, &StubSchema);

        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems.get("age", "must be a non-negative integer"),
            Some(&[2, 4][..])
        );
    }

    #[test]
    fn test_standalone_is_idempotent() {
        let table = table(&[("a.jpg", json!(-1), Value::Null)]);
        let first = check_rows_standalone(&table, &StubSchema);
        let second = check_rows_standalone(&table, &StubSchema);
        assert_eq!(first, second);
    }

    #[test]
    fn test_merged_null_never_erases_stored_values() {
        // Stored: {sex: male, age: 30}; row: {sex: null, age: 40}.
        // The merged record {sex: male, age: 40} passes the schema.
        let store = store_with(&[(
            "a.jpg",
            metadata(&[("sex", json!("male")), ("age", json!(30))]),
        )]);
        let table = table(&[("a.jpg", json!(40), Value::Null)]);

        let outcome =
            check_rows_merged(&table, IdentifierColumn::Filename, &store, COHORT, &StubSchema)
                .unwrap();
        assert!(outcome.column_problems.is_empty());
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_merged_row_values_take_precedence() {
        let store = store_with(&[(
            "a.jpg",
            metadata(&[("sex", json!("male")), ("age", json!(30))]),
        )]);
        // The row's bad age overwrites the stored good one.
        let table = table(&[("a.jpg", json!(-7), Value::Null)]);

        let outcome =
            check_rows_merged(&table, IdentifierColumn::Filename, &store, COHORT, &StubSchema)
                .unwrap();
        assert_eq!(
            outcome.column_problems.get("age", "must be a non-negative integer"),
            Some(&[2][..])
        );
    }

    #[test]
    fn test_merged_skips_and_reports_missing_keys() {
        let store = store_with(&[(
            "a.jpg",
            metadata(&[("sex", json!("male")), ("age", json!(30))]),
        )]);
        let table = table(&[
            ("ghost.jpg", json!(30), json!("male")),
            ("a.jpg", json!(40), Value::Null),
            ("ghost.jpg", json!(31), json!("male")),
        ]);

        let outcome =
            check_rows_merged(&table, IdentifierColumn::Filename, &store, COHORT, &StubSchema)
                .unwrap();
        assert!(outcome.column_problems.is_empty());
        assert_eq!(outcome.missing, vec!["ghost.jpg".to_string()]);
    }
}
