//! File: JSON-on-disk store, one file per machine.
//!
//! Layout under the data directory:
//! - `<serial>.json`: the latest [`StoredRecord`]
//! - `<serial>.event.json`: the current [`StoredEvent`], if any

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::client::store::{EventStore, ReportStore, StoreError, StoredEvent, StoredRecord};
use crate::report::model::NormalizedReport;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn report_path(&self, serial_number: &str) -> Result<PathBuf, StoreError> {
        Ok(self.dir.join(format!("{}.json", checked_key(serial_number)?)))
    }

    pub fn event_path(&self, serial_number: &str) -> Result<PathBuf, StoreError> {
        Ok(self.dir.join(format!("{}.event.json", checked_key(serial_number)?)))
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec_pretty(value)?;
        fs::write(path, body)?;
        Ok(())
    }
}

/// Serial numbers become file names, so only `[A-Za-z0-9_-]` is accepted.
fn checked_key(serial_number: &str) -> Result<&str, StoreError> {
    let valid = !serial_number.is_empty()
        && serial_number
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(serial_number)
    } else {
        Err(StoreError::InvalidKey(serial_number.to_string()))
    }
}

impl ReportStore for JsonFileStore {
    fn upsert(
        &self,
        serial_number: &str,
        report: &NormalizedReport,
    ) -> Result<StoredRecord, StoreError> {
        let path = self.report_path(serial_number)?;
        let created = !path.exists();
        let record = StoredRecord::new(report.clone(), created);

        self.write_json(&path, &record)?;
        debug!(path = %path.display(), created, "stored report");
        Ok(record)
    }
}

impl EventStore for JsonFileStore {
    fn store_event(
        &self,
        serial_number: &str,
        severity: &str,
        category: &str,
        payload_json: &str,
    ) -> Result<(), StoreError> {
        let path = self.event_path(serial_number)?;
        let event = StoredEvent {
            serial_number: serial_number.to_string(),
            severity: severity.to_string(),
            category: category.to_string(),
            payload_json: payload_json.to_string(),
        };
        self.write_json(&path, &event)
    }

    fn delete_event(&self, serial_number: &str) -> Result<(), StoreError> {
        let path = self.event_path(serial_number)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
