//! Mapper: copies translated keys from a canonical record into a
//! [`NormalizedReport`].

use serde::{Deserialize, Serialize};

use crate::parser::CanonicalRecord;
use crate::report::model::{NormalizedReport, ReportField, RequestContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Key in the client report, e.g. `ManifestName`.
    pub source: String,
    pub target: ReportField,
}

impl TranslationEntry {
    pub fn new(source: impl Into<String>, target: ReportField) -> Self {
        Self {
            source: source.into(),
            target,
        }
    }
}

/// Ordered source-key → report-field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    entries: Vec<TranslationEntry>,
}

impl TranslationTable {
    pub fn new(entries: Vec<TranslationEntry>) -> Self {
        Self { entries }
    }

    /// ManagedInstallReport keys used by munki.
    pub fn munki() -> Self {
        Self::new(default_entries())
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::munki()
    }
}

pub fn default_entries() -> Vec<TranslationEntry> {
    vec![
        TranslationEntry::new("ManagedInstallVersion", ReportField::Version),
        TranslationEntry::new("ManifestName", ReportField::ManifestName),
        TranslationEntry::new("RunType", ReportField::RunType),
        TranslationEntry::new("StartTime", ReportField::StartTime),
        TranslationEntry::new("EndTime", ReportField::EndTime),
    ]
}

pub struct RecordMapper {
    table: TranslationTable,
}

impl RecordMapper {
    pub fn new(table: TranslationTable) -> Self {
        Self { table }
    }

    /// Total: keys missing from the record leave their field unset.
    pub fn map(
        &self,
        record: &CanonicalRecord,
        context: &RequestContext,
        timestamp: String,
    ) -> NormalizedReport {
        let mut report = NormalizedReport::new(context.serial_number.clone(), timestamp);

        for entry in self.table.entries() {
            if let Some(value) = record.get(&entry.source) {
                report.set_field(entry.target, value.clone());
            }
        }

        report
    }
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new(TranslationTable::default())
    }
}
