//! Built-in row schema for skin-image accession metadata.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{FieldError, RowSchema};
use crate::input::FieldMap;

static ISIC_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ISIC_\d{7}$").expect("valid isic_id pattern"));

const SEX_VALUES: &[&str] = &["male", "female"];

const BENIGN_MALIGNANT_VALUES: &[&str] = &[
    "benign",
    "malignant",
    "indeterminate",
    "indeterminate/benign",
    "indeterminate/malignant",
];

const DIAGNOSIS_VALUES: &[&str] = &[
    "actinic keratosis",
    "basal cell carcinoma",
    "dermatofibroma",
    "lentigo NOS",
    "lichenoid keratosis",
    "melanoma",
    "nevus",
    "seborrheic keratosis",
    "solar lentigo",
    "squamous cell carcinoma",
    "vascular lesion",
    "other",
];

const DIAGNOSIS_CONFIRM_TYPE_VALUES: &[&str] = &[
    "histopathology",
    "serial imaging showing no change",
    "single image expert consensus",
    "confocal microscopy with consensus dermoscopy",
];

const ANATOM_SITE_GENERAL_VALUES: &[&str] = &[
    "head/neck",
    "upper extremity",
    "lower extremity",
    "torso",
    "lateral torso",
    "palms/soles",
    "oral/genital",
];

/// The reference [`RowSchema`] for accession metadata rows.
///
/// Key columns are exempt from the unrecognized-field check: `filename`
/// carries no metadata, and `isic_id` is checked for format only.
pub struct ArchiveRowSchema;

impl ArchiveRowSchema {
    /// Create the schema.
    pub fn new() -> Self {
        Self
    }

    fn check_field(&self, field: &str, value: &Value) -> Option<FieldError> {
        let fail = |message: &str| Some(FieldError::new(field, message));

        match field {
            "filename" => None,
            "isic_id" => match as_str(value) {
                Some(s) if ISIC_ID_PATTERN.is_match(s) => None,
                _ => fail("must match ISIC_0000000 format"),
            },
            "age" => match as_integer(value) {
                Some(age) if (0..=85).contains(&age) => None,
                Some(_) => fail("must be between 0 and 85"),
                None => fail("must be a whole number"),
            },
            "sex" => check_vocabulary(field, value, SEX_VALUES),
            "benign_malignant" => check_vocabulary(field, value, BENIGN_MALIGNANT_VALUES),
            "diagnosis" => check_vocabulary(field, value, DIAGNOSIS_VALUES),
            "diagnosis_confirm_type" => {
                check_vocabulary(field, value, DIAGNOSIS_CONFIRM_TYPE_VALUES)
            }
            "anatom_site_general" => check_vocabulary(field, value, ANATOM_SITE_GENERAL_VALUES),
            "melanocytic" => match as_bool(value) {
                Some(_) => None,
                None => fail("must be a boolean"),
            },
            "mel_thick_mm" => match as_number(value) {
                Some(mm) if mm > 0.0 => None,
                _ => fail("must be a positive number"),
            },
            "acquisition_day" => match as_str(value) {
                Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => None,
                _ => fail("must be an ISO date (YYYY-MM-DD)"),
            },
            _ => fail("unrecognized field"),
        }
    }
}

impl RowSchema for ArchiveRowSchema {
    fn check(&self, fields: &FieldMap) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, value) in fields {
            // Missing values are always acceptable at the field level.
            if value.is_null() {
                continue;
            }
            if let Some(error) = self.check_field(field, value) {
                errors.push(error);
            }
        }

        errors.extend(check_cross_field(fields));
        errors
    }
}

impl Default for ArchiveRowSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Cross-field consistency rules, applied to the full (possibly merged) row.
fn check_cross_field(fields: &FieldMap) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let diagnosis = fields.get("diagnosis").and_then(as_str);

    if non_null(fields, "mel_thick_mm") && diagnosis != Some("melanoma") {
        errors.push(FieldError::new(
            "mel_thick_mm",
            "requires a melanoma diagnosis",
        ));
    }

    let indeterminate = fields
        .get("benign_malignant")
        .and_then(as_str)
        .is_some_and(|v| v.starts_with("indeterminate"));
    let confirm = fields.get("diagnosis_confirm_type").and_then(as_str);
    if indeterminate && confirm != Some("histopathology") {
        errors.push(FieldError::new(
            "benign_malignant",
            "indeterminate lesions require histopathology confirmation",
        ));
    }

    errors
}

fn non_null(fields: &FieldMap, field: &str) -> bool {
    fields.get(field).is_some_and(|v| !v.is_null())
}

fn check_vocabulary(field: &str, value: &Value, allowed: &[&str]) -> Option<FieldError> {
    match as_str(value) {
        Some(s) if allowed.contains(&s) => None,
        _ => Some(FieldError::new(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        )),
    }
}

fn as_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim)
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
