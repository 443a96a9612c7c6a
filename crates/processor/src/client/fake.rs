//! Fake: in-memory test double for the store collaborators.
//!
//! [`MemoryStore`] implements both [`ReportStore`] and [`EventStore`] on
//! concurrent maps, so one instance can back tests and embedded use
//! without a database.

use dashmap::DashMap;

use crate::client::store::{EventStore, ReportStore, StoreError, StoredEvent, StoredRecord};
use crate::report::model::NormalizedReport;

#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: DashMap<String, NormalizedReport>,
    events: DashMap<String, StoredEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, serial_number: &str) -> Option<NormalizedReport> {
        self.reports.get(serial_number).map(|r| r.value().clone())
    }

    pub fn event(&self, serial_number: &str) -> Option<StoredEvent> {
        self.events.get(serial_number).map(|e| e.value().clone())
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }
}

impl ReportStore for MemoryStore {
    fn upsert(
        &self,
        serial_number: &str,
        report: &NormalizedReport,
    ) -> Result<StoredRecord, StoreError> {
        let created = self
            .reports
            .insert(serial_number.to_string(), report.clone())
            .is_none();
        Ok(StoredRecord::new(report.clone(), created))
    }
}

impl EventStore for MemoryStore {
    fn store_event(
        &self,
        serial_number: &str,
        severity: &str,
        category: &str,
        payload_json: &str,
    ) -> Result<(), StoreError> {
        self.events.insert(
            serial_number.to_string(),
            StoredEvent {
                serial_number: serial_number.to_string(),
                severity: severity.to_string(),
                category: category.to_string(),
                payload_json: payload_json.to_string(),
            },
        );
        Ok(())
    }

    fn delete_event(&self, serial_number: &str) -> Result<(), StoreError> {
        self.events.remove(serial_number);
        Ok(())
    }
}
