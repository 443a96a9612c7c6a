//! Model: normalized report, derived event and request context.

use serde::{Deserialize, Serialize};

use crate::filter::MessageCategory;
use crate::parser::Value;

/// `YYYY-MM-DD HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const ERROR_CATEGORY: &str = "munki.error";
pub const WARNING_CATEGORY: &str = "munki.warning";

/// Per-request caller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub serial_number: String,
}

impl RequestContext {
    pub fn new(serial_number: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
        }
    }
}

/// Report fields filled from the translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    Version,
    ManifestName,
    RunType,
    StartTime,
    EndTime,
}

impl ReportField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportField::Version => "version",
            ReportField::ManifestName => "manifest_name",
            ReportField::RunType => "run_type",
            ReportField::StartTime => "start_time",
            ReportField::EndTime => "end_time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedReport {
    pub serial_number: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    error_count: usize,
    warning_count: usize,
    error_messages: Vec<String>,
    warning_messages: Vec<String>,
}

impl NormalizedReport {
    pub fn new(serial_number: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            timestamp: timestamp.into(),
            version: None,
            manifest_name: None,
            run_type: None,
            start_time: None,
            end_time: None,
            error_count: 0,
            warning_count: 0,
            error_messages: Vec::new(),
            warning_messages: Vec::new(),
        }
    }

    fn slot(&mut self, field: ReportField) -> &mut Option<Value> {
        match field {
            ReportField::Version => &mut self.version,
            ReportField::ManifestName => &mut self.manifest_name,
            ReportField::RunType => &mut self.run_type,
            ReportField::StartTime => &mut self.start_time,
            ReportField::EndTime => &mut self.end_time,
        }
    }

    pub fn field(&self, field: ReportField) -> Option<&Value> {
        match field {
            ReportField::Version => self.version.as_ref(),
            ReportField::ManifestName => self.manifest_name.as_ref(),
            ReportField::RunType => self.run_type.as_ref(),
            ReportField::StartTime => self.start_time.as_ref(),
            ReportField::EndTime => self.end_time.as_ref(),
        }
    }

    pub fn set_field(&mut self, field: ReportField, value: Value) {
        *self.slot(field) = Some(value);
    }

    /// Replaces a category's messages; the count always follows the list.
    pub fn set_messages(&mut self, category: MessageCategory, messages: Vec<String>) {
        match category {
            MessageCategory::Error => {
                self.error_count = messages.len();
                self.error_messages = messages;
            }
            MessageCategory::Warning => {
                self.warning_count = messages.len();
                self.warning_messages = messages;
            }
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }

    pub fn warning_messages(&self) -> &[String] {
        &self.warning_messages
    }

    /// Surviving errors as a JSON array, the form persisted in `error_json`.
    pub fn error_json(&self) -> String {
        serde_json::to_string(&self.error_messages).unwrap_or_else(|_| "[]".to_string())
    }

    /// Surviving warnings as a JSON array, the form persisted in `warning_json`.
    pub fn warning_json(&self) -> String {
        serde_json::to_string(&self.warning_messages).unwrap_or_else(|_| "[]".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    Error { error: String },
    Warning { warning: String },
    Count { count: usize },
}

impl EventPayload {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Summary event for a report. `None` asks the caller to remove any
/// event previously stored for the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "severity", rename_all = "snake_case")]
pub enum DerivedEvent {
    Danger {
        category: &'static str,
        payload: EventPayload,
    },
    Warning {
        category: &'static str,
        payload: EventPayload,
    },
    None,
}

impl DerivedEvent {
    pub fn severity(&self) -> &'static str {
        match self {
            DerivedEvent::Danger { .. } => "danger",
            DerivedEvent::Warning { .. } => "warning",
            DerivedEvent::None => "none",
        }
    }

    pub fn category(&self) -> Option<&'static str> {
        match self {
            DerivedEvent::Danger { category, .. } | DerivedEvent::Warning { category, .. } => {
                Some(*category)
            }
            DerivedEvent::None => None,
        }
    }

    pub fn payload(&self) -> Option<&EventPayload> {
        match self {
            DerivedEvent::Danger { payload, .. } | DerivedEvent::Warning { payload, .. } => {
                Some(payload)
            }
            DerivedEvent::None => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, DerivedEvent::None)
    }
}
