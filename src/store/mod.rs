//! Master Table persistence.
//!
//! The table is one file holding every record ever uploaded, deduplicated on
//! (patient name, surgery date, clinic date). Each upload loads the whole
//! table, merges the new records in, and writes the result back in full.

pub mod csv_file;
pub mod sqlite;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StoreError;
use crate::record::PatientRecord;

pub use csv_file::CsvStore;
pub use sqlite::SqliteStore;

pub trait MasterStore {
    /// `None` when no table has been written yet.
    fn load(&self) -> Result<Option<Vec<PatientRecord>>, StoreError>;

    /// Overwrite the table with `records`, in order.
    fn replace(&self, records: &[PatientRecord]) -> Result<(), StoreError>;

    /// Remove the table. Returns `false` if there was nothing to remove.
    fn delete(&self) -> Result<bool, StoreError>;

    fn path(&self) -> &Path;
}

/// Pick a backend from the file extension: `.csv` is a flat file, anything
/// else is SQLite.
pub fn open(path: impl Into<PathBuf>) -> Box<dyn MasterStore> {
    let path = path.into();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvStore::new(path))
    } else {
        Box::new(SqliteStore::new(path))
    }
}

/// Concatenate and drop every record whose key was already seen. The first
/// occurrence wins and order is preserved.
pub fn merge(existing: Vec<PatientRecord>, incoming: Vec<PatientRecord>) -> Vec<PatientRecord> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    existing
        .into_iter()
        .chain(incoming)
        .filter(|r| {
            let (name, surgery, clinic) = r.dedup_key();
            seen.insert((name.to_string(), surgery.to_string(), clinic.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    /// Records parsed from the uploaded document(s).
    pub parsed: usize,
    /// Rows the table grew by after deduplication.
    pub added: usize,
    pub total: usize,
}

impl fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed: {} | Newly added: {} | Total records: {}",
            self.parsed, self.added, self.total
        )
    }
}

/// One read-modify-write cycle against the Master Table.
pub fn upload(store: &dyn MasterStore, incoming: Vec<PatientRecord>) -> Result<UploadSummary, StoreError> {
    let existing = store.load()?.unwrap_or_default();
    let before = existing.len();
    let parsed = incoming.len();

    let combined = merge(existing, incoming);
    store.replace(&combined)?;

    let summary = UploadSummary {
        parsed,
        added: combined.len().saturating_sub(before),
        total: combined.len(),
    };
    info!(
        path = %store.path().display(),
        parsed = summary.parsed,
        added = summary.added,
        total = summary.total,
        "master table updated"
    );
    Ok(summary)
}
