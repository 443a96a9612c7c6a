pub use super::model::{CanonicalRecord, DecodeError, DetectionResult, ReportFormat, Value};

pub trait FormatDetector: Send + Sync {
    /// `sample` has its leading whitespace already stripped.
    fn detect(&self, sample: &[u8]) -> DetectionResult;
}

pub trait ReportDecoder: Send + Sync {
    /// decode the full raw report into a canonical record
    fn decode(&self, raw: &[u8]) -> Result<CanonicalRecord, DecodeError>;
    fn name(&self) -> &'static str;
}
