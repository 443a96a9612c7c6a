use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Apple XML property list
    Plist,
    /// YAML document (full or flat `key: value` subset)
    Yaml,
    /// No format signal found
    Unknown,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Plist => "plist",
            ReportFormat::Yaml => "yaml",
            ReportFormat::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub format: ReportFormat,
    /// The marker that decided the match, for diagnostics.
    pub signal: Option<&'static str>,
}

impl DetectionResult {
    pub fn matched(format: ReportFormat, signal: &'static str) -> Self {
        Self {
            format,
            signal: Some(signal),
        }
    }

    pub fn no_match() -> Self {
        Self {
            format: ReportFormat::Unknown,
            signal: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.format != ReportFormat::Unknown
    }
}

/// Failure of a single decoder tier. Never surfaced past the parser: the
/// chain moves on to the next tier instead.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Non-UTF8 content")]
    NonUtf8,

    #[error("Invalid plist: {0}")]
    Plist(String),

    #[error("Invalid YAML: {0}")]
    Yaml(String),

    #[error("Top-level {0} is not a mapping")]
    NotAMapping(&'static str),
}

/// Dynamically typed value produced by the decoders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Loose truthiness: null, false, zero and empty containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Sequence(items) => !items.is_empty(),
            Value::Mapping(map) => !map.is_empty(),
        }
    }
}

/// Scalars render as their natural text; containers render as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::Sequence(_) | Value::Mapping(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Uniform decoded report: top-level string keys to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord(BTreeMap<String, Value>);

impl CanonicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a value, replacing any earlier value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for CanonicalRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for CanonicalRecord {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Value::from("disk full").to_string(), "disk full");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_display_containers_as_json() {
        let seq = Value::from(vec!["a", "b"]);
        assert_eq!(seq.to_string(), r#"["a","b"]"#);

        let mut map = BTreeMap::new();
        map.insert("k".to_string(), Value::Integer(1));
        assert_eq!(Value::Mapping(map).to_string(), r#"{"k":1}"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Sequence(vec![]).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::from(vec!["x"]).is_truthy());
    }

    #[test]
    fn test_record_insert_last_wins() {
        let mut record = CanonicalRecord::new();
        record.insert("RunType", Value::from("auto"));
        record.insert("RunType", Value::from("manual"));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("RunType"), Some(&Value::from("manual")));
    }

    #[test]
    fn test_record_serializes_as_map() {
        let record: CanonicalRecord = vec![
            ("ManifestName".to_string(), Value::from("site_default")),
            ("Errors".to_string(), Value::from(vec!["boom"])),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Errors":["boom"],"ManifestName":"site_default"}"#);
    }

    #[test]
    fn test_detection_result_no_match() {
        let result = DetectionResult::no_match();
        assert_eq!(result.format, ReportFormat::Unknown);
        assert!(!result.is_match());
        assert!(DetectionResult::matched(ReportFormat::Yaml, "---").is_match());
    }
}
