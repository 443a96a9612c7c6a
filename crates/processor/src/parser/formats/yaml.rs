use crate::parser::traits::*;

/// YAML detector: document-start or directive marker, or a bare
/// `identifier:` at the very start of the sample.
pub struct YamlDetector;

impl FormatDetector for YamlDetector {
    fn detect(&self, sample: &[u8]) -> DetectionResult {
        if sample.starts_with(b"---") {
            return DetectionResult::matched(ReportFormat::Yaml, "---");
        }
        if sample.starts_with(b"%YAML") {
            return DetectionResult::matched(ReportFormat::Yaml, "%YAML");
        }
        if starts_with_key(sample) {
            return DetectionResult::matched(ReportFormat::Yaml, "key:");
        }
        DetectionResult::no_match()
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*:` anchored at the start.
fn starts_with_key(sample: &[u8]) -> bool {
    match sample.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return false,
    }
    let rest = &sample[1..];
    let ident_len = rest
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    rest.get(ident_len) == Some(&b':')
}

/// Full YAML data model via `serde_yaml`. The document root must be a mapping.
#[cfg(feature = "full-yaml")]
pub struct YamlDecoder;

#[cfg(feature = "full-yaml")]
impl ReportDecoder for YamlDecoder {
    fn decode(&self, raw: &[u8]) -> Result<CanonicalRecord, DecodeError> {
        let text = std::str::from_utf8(raw).map_err(|_| DecodeError::NonUtf8)?;
        let doc: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| DecodeError::Yaml(e.to_string()))?;

        match doc {
            serde_yaml::Value::Mapping(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key_to_string(&key), convert(value)))
                .collect()),
            serde_yaml::Value::Tagged(tagged) => match tagged.value {
                serde_yaml::Value::Mapping(map) => Ok(map
                    .into_iter()
                    .map(|(key, value)| (key_to_string(&key), convert(value)))
                    .collect()),
                _ => Err(DecodeError::NotAMapping("YAML document")),
            },
            _ => Err(DecodeError::NotAMapping("YAML document")),
        }
    }

    fn name(&self) -> &'static str {
        "yaml"
    }
}

#[cfg(feature = "full-yaml")]
fn key_to_string(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(feature = "full-yaml")]
fn convert(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(convert).collect())
        }
        serde_yaml::Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| (key_to_string(&key), convert(value)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => convert(tagged.value),
    }
}
