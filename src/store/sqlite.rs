use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::MasterStore;
use crate::error::StoreError;
use crate::record::{Field, PatientRecord};

const TABLE: &str = "master_records";

/// Master Table kept as a single SQLite table, one TEXT column per field.
/// `id` preserves insertion order.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteStore { path: path.into() }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        init_schema(&conn)?;
        Ok(conn)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    let columns: Vec<String> = Field::ALL
        .iter()
        .map(|f| format!("{} TEXT NOT NULL DEFAULT ''", f.column()))
        .collect();
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, {});",
        TABLE,
        columns.join(", ")
    ))?;
    Ok(())
}

fn column_list() -> String {
    Field::ALL
        .iter()
        .map(|f| f.column())
        .collect::<Vec<_>>()
        .join(", ")
}

impl MasterStore for SqliteStore {
    fn load(&self) -> Result<Option<Vec<PatientRecord>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY id",
            column_list(),
            TABLE
        ))?;
        let rows = stmt
            .query_map([], |row| {
                let mut record = PatientRecord::default();
                for (i, field) in Field::ALL.into_iter().enumerate() {
                    record.set(field, row.get::<_, String>(i)?);
                }
                Ok(record)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(rows))
    }

    fn replace(&self, records: &[PatientRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = self.connect()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(&format!("DELETE FROM {}", TABLE), [])?;
        {
            let placeholders: Vec<String> = (1..=Field::ALL.len()).map(|i| format!("?{}", i)).collect();
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                TABLE,
                column_list(),
                placeholders.join(", ")
            ))?;
            for record in records {
                stmt.execute(rusqlite::params_from_iter(
                    Field::ALL.iter().map(|f| record.get(*f)),
                ))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
