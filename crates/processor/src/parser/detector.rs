use super::formats::*;
use super::traits::*;

/// Format detector orchestrator.
/// Runs detectors in priority order on the whitespace-trimmed input;
/// the first match wins. No match leaves the format `Unknown`.
pub struct FormatDetectorOrchestrator {
    detectors: Vec<Box<dyn FormatDetector>>,
}

impl FormatDetectorOrchestrator {
    pub fn new() -> Self {
        let detectors: Vec<Box<dyn FormatDetector>> = vec![
            // Order matters! Plist markers beat YAML-looking content
            Box::new(PlistDetector),
            Box::new(YamlDetector),
        ];

        Self { detectors }
    }

    pub fn detect(&self, raw: &[u8]) -> DetectionResult {
        let sample = trim_ascii_start(raw);

        self.detectors
            .iter()
            .map(|detector| detector.detect(sample))
            .find(DetectionResult::is_match)
            .unwrap_or_else(DetectionResult::no_match)
    }
}

impl Default for FormatDetectorOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips spaces, tabs, newlines, carriage returns, NUL and vertical tabs.
fn trim_ascii_start(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | b'\x0B'))
        .unwrap_or(raw.len());
    &raw[start..]
}
