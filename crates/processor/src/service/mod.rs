//! Service module: the report processing pipeline.

pub mod processor;

pub use processor::{ProcessError, ProcessedReport, ReportProcessor, RunOutcome};
