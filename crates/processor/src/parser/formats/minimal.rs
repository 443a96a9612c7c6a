//! Line-oriented fallback for flat `key: value` YAML.
//!
//! No nesting and no sequences: leading indentation is ignored and every
//! matching line lands at the top level. Lines that do not match the
//! `identifier: value` grammar are skipped.

use crate::parser::traits::*;

pub struct MinimalYamlDecoder;

impl ReportDecoder for MinimalYamlDecoder {
    fn decode(&self, raw: &[u8]) -> Result<CanonicalRecord, DecodeError> {
        let text = std::str::from_utf8(raw).map_err(|_| DecodeError::NonUtf8)?;
        Ok(parse_flat(text))
    }

    fn name(&self) -> &'static str {
        "minimal_yaml"
    }
}

pub fn parse_flat(text: &str) -> CanonicalRecord {
    let mut record = CanonicalRecord::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" || trimmed == "..." {
            continue;
        }

        if let Some((key, value)) = split_key_value(line) {
            record.insert(key, coerce_scalar(value));
        }
    }

    record
}

/// `^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(.*)$`
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start();
    let mut chars = rest.char_indices();

    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return None,
    }

    let key_end = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    let key = &rest[..key_end];
    let after_key = rest[key_end..].trim_start();
    let value = after_key.strip_prefix(':')?;

    Some((key, value.trim()))
}

/// Quotes, then booleans, then null, then numbers; anything else stays a string.
pub fn coerce_scalar(value: &str) -> Value {
    if let Some(inner) = strip_matching_quotes(value) {
        return Value::String(inner.to_string());
    }
    if value.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if value == "null" || value == "~" {
        return Value::Null;
    }
    if is_numeric(value) {
        let parsed = if value.contains('.') {
            value.parse::<f64>().ok().map(Value::Float)
        } else {
            // Exponent forms and out-of-range values saturate at the i64 bounds.
            value
                .parse::<i64>()
                .ok()
                .or_else(|| value.parse::<f64>().ok().map(|f| f as i64))
                .map(Value::Integer)
        };
        if let Some(number) = parsed {
            return number;
        }
    }
    Value::String(value.to_string())
}

fn strip_matching_quotes(value: &str) -> Option<&str> {
    if value.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
}

/// Optional sign, digits with an optional fraction, optional exponent.
fn is_numeric(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;

    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut mantissa = digits(&mut i);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == bytes.len()
}
