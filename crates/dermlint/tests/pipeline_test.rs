//! Integration tests for the full validation pipeline.

use std::io::Write;
use tempfile::NamedTempFile;

use dermlint::{
    AccessionRecord, Dermlint, FieldMap, IdentifierColumn, InMemoryStore, ProblemKind,
};
use serde_json::json;

const COHORT: &str = "msk-2024";

/// Helper to create a temporary CSV with given content.
fn create_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn record(blob: &str, metadata: &[(&str, serde_json::Value)]) -> AccessionRecord {
    AccessionRecord {
        isic_id: None,
        original_blob_name: blob.to_string(),
        metadata: metadata
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<FieldMap>(),
    }
}

fn cohort_store(records: Vec<AccessionRecord>) -> InMemoryStore {
    let mut store = InMemoryStore::new();
    for r in records {
        store.insert(COHORT, r);
    }
    store
}

// =============================================================================
// Structural Failures
// =============================================================================

#[test]
fn test_both_key_columns_short_circuits() {
    let file = create_csv("isic_id,filename,age\nISIC_0000001,img1.jpg,-5\n");
    let store = cohort_store(vec![record("img1.jpg", &[])]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    assert_eq!(report.problems.len(), 1);
    assert_eq!(
        report.problems[0].message,
        "Cannot provide both isic_id and filename columns."
    );
    assert_eq!(report.problems[0].kind, ProblemKind::Error);
    // No other stage ran, not even for the obviously bad age.
    assert!(report.row_problems.is_empty());
    assert!(report.merged_problems.is_empty());
}

#[test]
fn test_neither_key_column_short_circuits() {
    let file = create_csv("age,sex\n30,male\n");
    let store = cohort_store(vec![]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    assert_eq!(report.problems.len(), 1);
    assert_eq!(
        report.problems[0].message,
        "Must provide either isic_id or filename column."
    );
    assert!(report.row_problems.is_empty());
}

// =============================================================================
// Format & Existence
// =============================================================================

#[test]
fn test_duplicate_keys_reported_once_each() {
    let file = create_csv("filename,age\nimg1.jpg,30\nimg1.jpg,31\nimg2.jpg,32\n");
    let store = cohort_store(vec![record("img1.jpg", &[]), record("img2.jpg", &[])]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    let duplicate = report
        .problems
        .iter()
        .find(|p| p.message == "Duplicate filenames found.")
        .expect("duplicate problem");
    assert_eq!(duplicate.kind, ProblemKind::Error);
    assert_eq!(duplicate.context, vec![json!("img1.jpg")]);
}

#[test]
fn test_unknown_images_are_warnings() {
    let file = create_csv("filename,age\nimg1.jpg,30\nimg9.jpg,31\n");
    let store = cohort_store(vec![record("img1.jpg", &[])]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    let unknown = report
        .problems
        .iter()
        .find(|p| p.message == "Encountered unknown images in the CSV.")
        .expect("unknown-images problem");
    assert_eq!(unknown.kind, ProblemKind::Warning);
    assert_eq!(unknown.context, vec![json!("img9.jpg")]);
    // Warnings never make the report failing on their own.
    assert!(!report.has_errors());
}

#[test]
fn test_records_outside_cohort_never_match() {
    let file = create_csv("filename,age\nimg1.jpg,30\n");
    let mut store = InMemoryStore::new();
    store.insert("another-cohort", record("img1.jpg", &[]));

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    assert!(report
        .problems
        .iter()
        .any(|p| p.message == "Encountered unknown images in the CSV."));
}

// =============================================================================
// Row Validation
// =============================================================================

#[test]
fn test_standalone_aggregation_orders_lines_ascending() {
    // Three rows all fail the age bound; one entry, three line numbers.
    let file = create_csv("filename,age\nimg1.jpg,-5\nimg2.jpg,-6\nimg3.jpg,-7\n");
    let store = cohort_store(vec![
        record("img1.jpg", &[]),
        record("img2.jpg", &[]),
        record("img3.jpg", &[]),
    ]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    assert_eq!(report.row_problems.len(), 1);
    assert_eq!(
        report.row_problems.get("age", "must be between 0 and 85"),
        Some(&[2, 3, 4][..])
    );
}

#[test]
fn test_merged_mode_catches_partial_update_breakage() {
    // Stored record is an indeterminate lesion confirmed by histopathology.
    // The partial update rewrites the confirmation type, which only breaks
    // once merged with the stored benign_malignant value.
    let file = create_csv(
        "filename,diagnosis_confirm_type\nimg1.jpg,single image expert consensus\n",
    );
    let store = cohort_store(vec![record(
        "img1.jpg",
        &[
            ("benign_malignant", json!("indeterminate")),
            ("diagnosis_confirm_type", json!("histopathology")),
        ],
    )]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    assert!(report.row_problems.is_empty());
    assert_eq!(
        report.merged_problems.get(
            "benign_malignant",
            "indeterminate lesions require histopathology confirmation"
        ),
        Some(&[2][..])
    );
}

#[test]
fn test_merged_mode_null_preserves_stored_values() {
    // Stored {sex: male, age: 30}, row {sex: null, age: 40} merges to
    // {sex: male, age: 40}: a clean record.
    let file = create_csv("filename,sex,age\nimg1.jpg,,40\n");
    let store = cohort_store(vec![record(
        "img1.jpg",
        &[("sex", json!("male")), ("age", json!(30))],
    )]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    assert!(report.merged_problems.is_empty());
    assert!(!report.has_errors());
}

// =============================================================================
// End-to-End
// =============================================================================

#[test]
fn test_end_to_end_duplicate_and_bad_age() {
    // filename img1.jpg appears twice, once with a negative age; img1.jpg
    // exists in the cohort.
    let file = create_csv("filename,age\nimg1.jpg,-5\nimg1.jpg,25\n");
    let store = cohort_store(vec![record("img1.jpg", &[])]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();

    let duplicate = report
        .problems
        .iter()
        .find(|p| p.message == "Duplicate filenames found.")
        .expect("duplicate problem");
    assert_eq!(duplicate.context, vec![json!("img1.jpg")]);

    assert_eq!(
        report.row_problems.get("age", "must be between 0 and 85"),
        Some(&[2][..])
    );
    assert!(report.has_errors());
    assert_eq!(report.identifier, Some(IdentifierColumn::Filename));
    assert_eq!(report.summary.rows, 2);
}

#[test]
fn test_report_serializes_to_json() {
    let file = create_csv("filename,age\nimg1.jpg,-5\n");
    let store = cohort_store(vec![record("img1.jpg", &[])]);

    let report = Dermlint::new().check_file(file.path(), &store, COHORT).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["identifier"], json!("filename"));
    assert_eq!(
        value["row_problems"][0],
        json!({"column": "age", "message": "must be between 0 and 85", "lines": [2]})
    );
    assert!(value["source"]["hash"].as_str().unwrap().starts_with("sha256:"));
}
