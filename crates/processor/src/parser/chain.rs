use tracing::debug;

use super::detector::FormatDetectorOrchestrator;
use super::formats::*;
use super::traits::*;

/// Ordered decoder attempts. The first decoder that succeeds wins; a failing
/// decoder only hands over to the next one.
pub struct DecoderChain {
    decoders: Vec<Box<dyn ReportDecoder>>,
}

impl DecoderChain {
    pub fn new(decoders: Vec<Box<dyn ReportDecoder>>) -> Self {
        Self { decoders }
    }

    /// Full YAML (when compiled in), then the flat line-oriented fallback.
    pub fn yaml() -> Self {
        Self::new(yaml_decoders())
    }

    /// Plist first; on failure the same bytes go through the YAML tiers.
    pub fn plist() -> Self {
        let mut decoders: Vec<Box<dyn ReportDecoder>> = vec![Box::new(PlistDecoder)];
        decoders.extend(yaml_decoders());
        Self::new(decoders)
    }

    /// Returns the record and the name of the decoder that produced it.
    pub fn decode(&self, raw: &[u8]) -> Option<(CanonicalRecord, &'static str)> {
        for decoder in &self.decoders {
            match decoder.decode(raw) {
                Ok(record) => return Some((record, decoder.name())),
                Err(e) => debug!(decoder = decoder.name(), error = %e, "decoder failed, trying next"),
            }
        }
        None
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }
}

fn yaml_decoders() -> Vec<Box<dyn ReportDecoder>> {
    #[allow(unused_mut)]
    let mut decoders: Vec<Box<dyn ReportDecoder>> = Vec::new();
    #[cfg(feature = "full-yaml")]
    decoders.push(Box::new(YamlDecoder));
    decoders.push(Box::new(MinimalYamlDecoder));
    decoders
}

/// Outcome of a successful parse.
#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub record: CanonicalRecord,
    pub detected: ReportFormat,
    pub decoder: &'static str,
}

/// Detects the report format and walks the matching decoder chain.
pub struct ReportParser {
    detector: FormatDetectorOrchestrator,
    plist: DecoderChain,
    yaml: DecoderChain,
}

impl ReportParser {
    pub fn new() -> Self {
        Self {
            detector: FormatDetectorOrchestrator::new(),
            plist: DecoderChain::plist(),
            yaml: DecoderChain::yaml(),
        }
    }

    /// `None` for empty input or when every decoder tier fails.
    pub fn parse(&self, raw: &[u8]) -> Option<CanonicalRecord> {
        self.parse_detailed(raw).map(|parsed| parsed.record)
    }

    pub fn parse_detailed(&self, raw: &[u8]) -> Option<ParsedReport> {
        if raw.is_empty() {
            return None;
        }

        let detection = self.detector.detect(raw);
        debug!(
            format = detection.format.as_str(),
            signal = detection.signal.unwrap_or("none"),
            "detected report format"
        );

        // Inconclusive detection keeps the historical plist-first behaviour.
        let chain = match detection.format {
            ReportFormat::Yaml => &self.yaml,
            ReportFormat::Plist | ReportFormat::Unknown => &self.plist,
        };

        chain.decode(raw).map(|(record, decoder)| ParsedReport {
            record,
            detected: detection.format,
            decoder,
        })
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>ManifestName</key>
    <string>site_default</string>
    <key>Notes</key>
    <string>RunType: manual</string>
</dict>
</plist>
"#;

    #[test]
    fn test_parse_empty_input() {
        let parser = ReportParser::new();
        assert!(parser.parse(b"").is_none());
    }

    #[test]
    fn test_parse_plist() {
        let parser = ReportParser::new();
        let parsed = parser.parse_detailed(PLIST.as_bytes()).unwrap();

        assert_eq!(parsed.detected, ReportFormat::Plist);
        assert_eq!(parsed.decoder, "plist");
        assert_eq!(parsed.record.get("ManifestName"), Some(&Value::from("site_default")));
        assert!(!parsed.record.contains_key("RunType"));
    }

    #[test]
    fn test_parse_flat_yaml() {
        let parser = ReportParser::new();
        let parsed = parser
            .parse_detailed(b"ManifestName: site_default\nRunType: auto\n")
            .unwrap();

        assert_eq!(parsed.detected, ReportFormat::Yaml);
        assert_eq!(parsed.record.get("RunType"), Some(&Value::from("auto")));
    }

    #[test]
    fn test_malformed_plist_falls_back_to_yaml() {
        let parser = ReportParser::new();
        let raw = b"<?xml version=\"1.0\"?>\nManifestName: site_default\nRunType: auto\n";
        let parsed = parser.parse_detailed(raw).unwrap();

        assert_eq!(parsed.detected, ReportFormat::Plist);
        assert_ne!(parsed.decoder, "plist");
        assert_eq!(parsed.record.get("ManifestName"), Some(&Value::from("site_default")));
        assert_eq!(parsed.record.get("RunType"), Some(&Value::from("auto")));
    }

    #[test]
    fn test_garbled_input_yields_empty_record() {
        let parser = ReportParser::new();
        // Neither the plist decoder nor the YAML tiers find any key.
        let record = parser.parse(b"%%% garbled ### \n!!! noise").unwrap_or_default();
        assert!(record.is_empty());
    }

    #[test]
    fn test_non_utf8_garbage_fails_every_tier() {
        let parser = ReportParser::new();
        assert!(parser.parse(b"\xFF\xFE\x00\x01").is_none());
    }

    #[test]
    fn test_chain_takes_first_success() {
        let chain = DecoderChain::new(vec![Box::new(PlistDecoder), Box::new(MinimalYamlDecoder)]);
        let (record, decoder) = chain.decode(b"RunType: auto").unwrap();
        assert_eq!(decoder, "minimal_yaml");
        assert_eq!(record.get("RunType"), Some(&Value::from("auto")));
    }

    #[test]
    fn test_chain_order() {
        let names = DecoderChain::plist().names();
        assert_eq!(names.first(), Some(&"plist"));
        assert_eq!(names.last(), Some(&"minimal_yaml"));

        #[cfg(feature = "full-yaml")]
        assert_eq!(DecoderChain::yaml().names(), vec!["yaml", "minimal_yaml"]);
        #[cfg(not(feature = "full-yaml"))]
        assert_eq!(DecoderChain::yaml().names(), vec!["minimal_yaml"]);
    }
}
