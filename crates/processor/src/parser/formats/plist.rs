use std::collections::BTreeMap;
use std::io::Cursor;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::parser::traits::*;

/// Plist detector: XML declaration, plist doctype or a `<plist` tag anywhere.
pub struct PlistDetector;

impl FormatDetector for PlistDetector {
    fn detect(&self, sample: &[u8]) -> DetectionResult {
        if sample.starts_with(b"<?xml") {
            return DetectionResult::matched(ReportFormat::Plist, "<?xml");
        }
        if contains(sample, b"<!DOCTYPE plist") {
            return DetectionResult::matched(ReportFormat::Plist, "<!DOCTYPE plist");
        }
        if contains(sample, b"<plist") {
            return DetectionResult::matched(ReportFormat::Plist, "<plist");
        }
        DetectionResult::no_match()
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// XML property list decoder backed by the `plist` crate.
pub struct PlistDecoder;

impl ReportDecoder for PlistDecoder {
    fn decode(&self, raw: &[u8]) -> Result<CanonicalRecord, DecodeError> {
        let value = plist::Value::from_reader_xml(Cursor::new(raw))
            .map_err(|e| DecodeError::Plist(e.to_string()))?;

        match value {
            plist::Value::Dictionary(dict) => Ok(dict
                .into_iter()
                .map(|(key, value)| (key, convert(value)))
                .collect()),
            _ => Err(DecodeError::NotAMapping("plist")),
        }
    }

    fn name(&self) -> &'static str {
        "plist"
    }
}

fn convert(value: plist::Value) -> Value {
    match value {
        plist::Value::String(s) => Value::String(s),
        plist::Value::Boolean(b) => Value::Bool(b),
        plist::Value::Integer(i) => match i.as_signed() {
            Some(n) => Value::Integer(n),
            // Only u64 values above i64::MAX land here.
            None => Value::Float(i.as_unsigned().unwrap_or_default() as f64),
        },
        plist::Value::Real(f) => Value::Float(f),
        plist::Value::Array(items) => Value::Sequence(items.into_iter().map(convert).collect()),
        plist::Value::Dictionary(dict) => Value::Mapping(
            dict.into_iter()
                .map(|(key, value)| (key, convert(value)))
                .collect::<BTreeMap<_, _>>(),
        ),
        plist::Value::Date(date) => {
            let time: SystemTime = date.into();
            let time: DateTime<Utc> = time.into();
            Value::String(time.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        }
        plist::Value::Data(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        plist::Value::Uid(uid) => Value::Integer(uid.get() as i64),
        _ => Value::Null,
    }
}

/// Encode a record as an XML property list. Null entries are omitted since
/// plists have no null type.
pub fn to_plist_xml(record: &CanonicalRecord) -> Result<Vec<u8>, plist::Error> {
    let dict: plist::Dictionary = record
        .iter()
        .filter_map(|(key, value)| to_plist_value(value).map(|v| (key.clone(), v)))
        .collect();

    let mut out = Vec::new();
    plist::Value::Dictionary(dict).to_writer_xml(&mut out)?;
    Ok(out)
}

fn to_plist_value(value: &Value) -> Option<plist::Value> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => plist::Value::Boolean(*b),
        Value::Integer(i) => plist::Value::Integer((*i).into()),
        Value::Float(f) => plist::Value::Real(*f),
        Value::String(s) => plist::Value::String(s.clone()),
        Value::Sequence(items) => {
            plist::Value::Array(items.iter().filter_map(to_plist_value).collect())
        }
        Value::Mapping(map) => plist::Value::Dictionary(
            map.iter()
                .filter_map(|(key, value)| to_plist_value(value).map(|v| (key.clone(), v)))
                .collect(),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>ManagedInstallVersion</key>
    <string>6.3.1.4580</string>
    <key>ManifestName</key>
    <string>site_default</string>
    <key>Errors</key>
    <array>
        <string>disk full</string>
    </array>
    <key>Warnings</key>
    <array/>
    <key>RunType</key>
    <string>auto</string>
    <key>Count</key>
    <integer>7</integer>
    <key>Ratio</key>
    <real>0.5</real>
    <key>Verbose</key>
    <true/>
</dict>
</plist>
"#;

    #[test]
    fn test_plist_detector_xml_declaration() {
        let result = PlistDetector.detect(b"<?xml version=\"1.0\"?><plist/>");
        assert_eq!(result.format, ReportFormat::Plist);
        assert_eq!(result.signal, Some("<?xml"));
    }

    #[test]
    fn test_plist_detector_doctype_anywhere() {
        let sample = b"garbage\n<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\">";
        let result = PlistDetector.detect(sample);
        assert_eq!(result.format, ReportFormat::Plist);
        assert_eq!(result.signal, Some("<!DOCTYPE plist"));
    }

    #[test]
    fn test_plist_detector_plist_tag_anywhere() {
        let result = PlistDetector.detect(b"RunType: auto\n<plist version=\"1.0\">");
        assert_eq!(result.format, ReportFormat::Plist);
        assert_eq!(result.signal, Some("<plist"));
    }

    #[test]
    fn test_plist_detector_no_match() {
        assert!(!PlistDetector.detect(b"RunType: auto").is_match());
        assert!(!PlistDetector.detect(b"").is_match());
    }

    #[test]
    fn test_plist_decoder_report() {
        let record = PlistDecoder.decode(REPORT.as_bytes()).unwrap();

        assert_eq!(record.get("ManifestName"), Some(&Value::from("site_default")));
        assert_eq!(record.get("ManagedInstallVersion"), Some(&Value::from("6.3.1.4580")));
        assert_eq!(record.get("Errors"), Some(&Value::from(vec!["disk full"])));
        assert_eq!(record.get("Warnings"), Some(&Value::Sequence(vec![])));
        assert_eq!(record.get("Count"), Some(&Value::Integer(7)));
        assert_eq!(record.get("Ratio"), Some(&Value::Float(0.5)));
        assert_eq!(record.get("Verbose"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_plist_decoder_nested_dict() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict><key>Conditions</key><dict><key>catalogs</key><array><string>production</string></array></dict></dict></plist>"#;
        let record = PlistDecoder.decode(xml.as_bytes()).unwrap();

        let mut inner = BTreeMap::new();
        inner.insert("catalogs".to_string(), Value::from(vec!["production"]));
        assert_eq!(record.get("Conditions"), Some(&Value::Mapping(inner)));
    }

    #[test]
    fn test_plist_decoder_rejects_malformed_xml() {
        let result = PlistDecoder.decode(b"<?xml version=\"1.0\"?>\n<plist><dict><key>a</key>");
        assert!(matches!(result, Err(DecodeError::Plist(_))));
    }

    #[test]
    fn test_plist_decoder_rejects_non_dict_root() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><array><string>x</string></array></plist>"#;
        let result = PlistDecoder.decode(xml.as_bytes());
        assert!(matches!(result, Err(DecodeError::NotAMapping("plist"))));
    }

    #[test]
    fn test_to_plist_xml_decodes_back() {
        let mut record = CanonicalRecord::new();
        record.insert("RunType", Value::from("auto"));
        record.insert("Errors", Value::from(vec!["a", "b"]));
        record.insert("Skipped", Value::Null);

        let xml = to_plist_xml(&record).unwrap();
        let decoded = PlistDecoder.decode(&xml).unwrap();

        assert_eq!(decoded.get("RunType"), Some(&Value::from("auto")));
        assert_eq!(decoded.get("Errors"), Some(&Value::from(vec!["a", "b"])));
        assert!(!decoded.contains_key("Skipped"));
    }
}
