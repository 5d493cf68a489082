use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::MasterStore;
use crate::error::StoreError;
use crate::record::{Field, PatientRecord};

/// Master Table as a flat CSV file with spreadsheet-style column headers.
/// Writes go to a sibling `.tmp` file which is then renamed over the table.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl MasterStore for CsvStore {
    fn load(&self) -> Result<Option<Vec<PatientRecord>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize::<PatientRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(records))
    }

    fn replace(&self, records: &[PatientRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }

        let tmp = self.tmp_path();
        {
            // Header written by hand so an empty table still has its columns.
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)?;
            writer.write_record(Field::ALL.map(Field::header))?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush().map_err(|e| Self::io_error(&tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| Self::io_error(&self.path, e))?;
        Ok(())
    }

    fn delete(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
