//! Extract: client-side reduction of munki's ManagedInstallReport.
//!
//! Keeps only the keys the server consumes, skips empty values and
//! removes duplicate Errors/Warnings (munki repeats missing-catalog
//! messages once per install/removal/update pass).

use std::collections::HashSet;

use crate::parser::{CanonicalRecord, Value};

pub const REPORT_KEYS: [&str; 7] = [
    "EndTime",
    "StartTime",
    "ManifestName",
    "ManagedInstallVersion",
    "Errors",
    "Warnings",
    "RunType",
];

const MESSAGE_KEYS: [&str; 2] = ["Errors", "Warnings"];

pub fn extract_report(install_report: &CanonicalRecord) -> CanonicalRecord {
    let mut extracted = CanonicalRecord::new();

    for key in REPORT_KEYS {
        let value = match install_report.get(key) {
            Some(value) if value.is_truthy() => value,
            _ => continue,
        };

        let value = match value {
            Value::Sequence(items) if MESSAGE_KEYS.contains(&key) => {
                Value::Sequence(unique(items))
            }
            other => other.clone(),
        };
        extracted.insert(key, value);
    }

    extracted
}

/// First occurrence wins; order is preserved. Items compare by their
/// rendered text.
fn unique(items: &[Value]) -> Vec<Value> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(item.to_string()))
        .cloned()
        .collect()
}
