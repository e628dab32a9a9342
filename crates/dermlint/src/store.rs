//! The accession store seam: previously ingested records, scoped by cohort.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DermlintError, Result};
use crate::identifier::IdentifierColumn;
use crate::input::FieldMap;

/// Read access to stored accessions.
///
/// Both operations are bulk by design: validation issues one query per
/// stage, never one per row. Records outside the named cohort must never
/// match.
pub trait AccessionStore {
    /// Of the given key values, return those that exist under the
    /// identifier's record field within the cohort.
    fn existing_keys(
        &self,
        cohort: &str,
        identifier: IdentifierColumn,
        keys: &[String],
    ) -> Result<HashSet<String>>;

    /// Fetch the stored metadata mapping for every matching key value
    /// within the cohort.
    fn fetch_metadata(
        &self,
        cohort: &str,
        identifier: IdentifierColumn,
        keys: &[String],
    ) -> Result<HashMap<String, FieldMap>>;
}

/// A stored accession, as held by [`InMemoryStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessionRecord {
    /// ISIC ID, absent until one is assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isic_id: Option<String>,
    /// Name of the originally uploaded image blob.
    pub original_blob_name: String,
    /// Previously persisted metadata for the image.
    #[serde(default)]
    pub metadata: FieldMap,
}

impl AccessionRecord {
    /// The record's key value under an identifier strategy.
    fn key(&self, identifier: IdentifierColumn) -> Option<&str> {
        match identifier {
            IdentifierColumn::IsicId => self.isic_id.as_deref(),
            IdentifierColumn::Filename => Some(&self.original_blob_name),
        }
    }
}

/// An [`AccessionStore`] held entirely in memory, keyed by cohort name.
///
/// Used by the CLI (loaded from a JSON snapshot) and by tests. The snapshot
/// format is a map from cohort name to a list of [`AccessionRecord`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    cohorts: HashMap<String, Vec<AccessionRecord>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to a cohort.
    pub fn insert(&mut self, cohort: impl Into<String>, record: AccessionRecord) {
        self.cohorts.entry(cohort.into()).or_default().push(record);
    }

    /// Load a store from a JSON snapshot file.
    pub fn from_snapshot_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DermlintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let cohorts = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { cohorts })
    }

    /// Cohort names present in the store.
    pub fn cohort_names(&self) -> impl Iterator<Item = &str> {
        self.cohorts.keys().map(|s| s.as_str())
    }

    fn records(&self, cohort: &str) -> &[AccessionRecord] {
        self.cohorts.get(cohort).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

impl AccessionStore for InMemoryStore {
    fn existing_keys(
        &self,
        cohort: &str,
        identifier: IdentifierColumn,
        keys: &[String],
    ) -> Result<HashSet<String>> {
        let wanted: HashSet<&str> = keys.iter().map(|s| s.as_str()).collect();
        Ok(self
            .records(cohort)
            .iter()
            .filter_map(|r| r.key(identifier))
            .filter(|k| wanted.contains(k))
            .map(|k| k.to_string())
            .collect())
    }

    fn fetch_metadata(
        &self,
        cohort: &str,
        identifier: IdentifierColumn,
        keys: &[String],
    ) -> Result<HashMap<String, FieldMap>> {
        let wanted: HashSet<&str> = keys.iter().map(|s| s.as_str()).collect();
        Ok(self
            .records(cohort)
            .iter()
            .filter_map(|r| r.key(identifier).map(|k| (k, r)))
            .filter(|(k, _)| wanted.contains(k))
            .map(|(k, r)| (k.to_string(), r.metadata.clone()))
            .collect())
    }
}
