//! Store traits: persistence and event-store collaborators.
//!
//! The processor never talks to a database directly; it hands its output
//! to a [`ReportStore`] and an [`EventStore`]. `fake.rs` provides the
//! in-memory double, `file.rs` a JSON-on-disk implementation.

use serde::Serialize;
use thiserror::Error;

use crate::report::model::NormalizedReport;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid serial number for storage: {0:?}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of an upsert keyed by serial number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    /// `true` when no record existed for this serial number before.
    pub created: bool,
    #[serde(flatten)]
    pub report: NormalizedReport,
    pub error_json: String,
    pub warning_json: String,
}

impl StoredRecord {
    pub fn new(report: NormalizedReport, created: bool) -> Self {
        Self {
            created,
            error_json: report.error_json(),
            warning_json: report.warning_json(),
            report,
        }
    }
}

/// A stored event row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredEvent {
    pub serial_number: String,
    pub severity: String,
    pub category: String,
    pub payload_json: String,
}

pub trait ReportStore: Send + Sync {
    /// Update-or-insert by unique serial number.
    fn upsert(
        &self,
        serial_number: &str,
        report: &NormalizedReport,
    ) -> Result<StoredRecord, StoreError>;
}

pub trait EventStore: Send + Sync {
    fn store_event(
        &self,
        serial_number: &str,
        severity: &str,
        category: &str,
        payload_json: &str,
    ) -> Result<(), StoreError>;

    /// Removes any event stored for `serial_number`; a no-op when none exists.
    fn delete_event(&self, serial_number: &str) -> Result<(), StoreError>;
}
