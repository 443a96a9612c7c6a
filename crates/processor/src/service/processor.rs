use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::clock::{Clock, SystemClock};
use crate::client::store::{EventStore, ReportStore, StoreError, StoredRecord};
use crate::client::truncate::{MaxLength, Truncate};
use crate::filter::{FilterError, SuppressionRules};
use crate::parser::{ReportFormat, ReportParser};
use crate::report::{
    DerivedEvent, EventDeriver, MessageClassifier, NormalizedReport, RecordMapper, RequestContext,
};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Error Processing Request: No data found")]
    NoInput,

    #[error("Error Processing Request: Could not parse data")]
    Unparsable,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ProcessError {
    /// Stable code distinguishing "no data" from "unparsable data".
    pub fn code(&self) -> &'static str {
        match self {
            ProcessError::NoInput => "no_input",
            ProcessError::Unparsable => "unparsable",
            ProcessError::Store(_) => "store",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedReport {
    pub report: NormalizedReport,
    pub event: DerivedEvent,
    pub format: ReportFormat,
    pub decoder: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub stored: StoredRecord,
    pub event: DerivedEvent,
}

/// The full report pipeline: parse, map, classify, derive.
///
/// Holds only immutable configuration, so a single instance can be shared
/// behind an `Arc` by concurrent requests.
pub struct ReportProcessor {
    parser: ReportParser,
    mapper: RecordMapper,
    classifier: MessageClassifier,
    deriver: EventDeriver,
    clock: Arc<dyn Clock>,
}

impl ReportProcessor {
    pub fn new(
        mapper: RecordMapper,
        classifier: MessageClassifier,
        deriver: EventDeriver,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            parser: ReportParser::new(),
            mapper,
            classifier,
            deriver,
            clock,
        }
    }

    /// Stock munki configuration with the system clock.
    pub fn munki_defaults() -> Result<Self, FilterError> {
        let truncate: Arc<dyn Truncate> = Arc::new(MaxLength::default());
        Ok(Self::new(
            RecordMapper::default(),
            MessageClassifier::new(SuppressionRules::munki_defaults()?),
            EventDeriver::new(truncate),
            Arc::new(SystemClock),
        ))
    }

    /// Pure transformation of one submission. No collaborator is touched.
    pub fn process(
        &self,
        raw: Option<Bytes>,
        context: &RequestContext,
    ) -> Result<ProcessedReport, ProcessError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ProcessError::NoInput),
        };

        let parsed = match self.parser.parse_detailed(&raw) {
            Some(parsed) if !parsed.record.is_empty() => parsed,
            _ => {
                warn!(serial = %context.serial_number, bytes = raw.len(), "could not parse report");
                return Err(ProcessError::Unparsable);
            }
        };
        debug!(
            serial = %context.serial_number,
            format = parsed.detected.as_str(),
            decoder = parsed.decoder,
            keys = parsed.record.len(),
            "decoded report"
        );

        let mut report = self.mapper.map(&parsed.record, context, self.clock.now());
        self.classifier.apply(&parsed.record, &mut report);
        let event = self.deriver.derive_for(&report);

        info!(
            serial = %context.serial_number,
            errors = report.error_count(),
            warnings = report.warning_count(),
            severity = event.severity(),
            "processed report"
        );

        Ok(ProcessedReport {
            report,
            event,
            format: parsed.detected,
            decoder: parsed.decoder,
        })
    }

    /// Processes a submission, upserts the report and stores or clears the event.
    pub fn run(
        &self,
        raw: Option<Bytes>,
        context: &RequestContext,
        reports: &dyn ReportStore,
        events: &dyn EventStore,
    ) -> Result<RunOutcome, ProcessError> {
        let processed = self.process(raw, context)?;
        let serial = context.serial_number.as_str();

        let stored = reports.upsert(serial, &processed.report)?;

        match (processed.event.category(), processed.event.payload()) {
            (Some(category), Some(payload)) => {
                events.store_event(serial, processed.event.severity(), category, &payload.to_json())?
            }
            _ => events.delete_event(serial)?,
        }

        Ok(RunOutcome {
            stored,
            event: processed.event,
        })
    }
}
