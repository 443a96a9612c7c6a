//! Event: derives the summary event from error and warning counts.

use std::sync::Arc;

use crate::client::truncate::Truncate;
use crate::report::model::{
    DerivedEvent, EventPayload, NormalizedReport, ERROR_CATEGORY, WARNING_CATEGORY,
};

pub struct EventDeriver {
    truncate: Arc<dyn Truncate>,
}

impl EventDeriver {
    pub fn new(truncate: Arc<dyn Truncate>) -> Self {
        Self { truncate }
    }

    pub fn derive_for(&self, report: &NormalizedReport) -> DerivedEvent {
        self.derive(
            report.error_count(),
            report.warning_count(),
            report.error_messages(),
            report.warning_messages(),
        )
    }

    /// Errors outrank warnings; a single message is quoted, several are counted.
    pub fn derive(
        &self,
        error_count: usize,
        warning_count: usize,
        error_messages: &[String],
        warning_messages: &[String],
    ) -> DerivedEvent {
        match (error_count, warning_count) {
            (1, _) => DerivedEvent::Danger {
                category: ERROR_CATEGORY,
                payload: EventPayload::Error {
                    error: self.first(error_messages),
                },
            },
            (n, _) if n > 1 => DerivedEvent::Danger {
                category: ERROR_CATEGORY,
                payload: EventPayload::Count { count: n },
            },
            (_, 1) => DerivedEvent::Warning {
                category: WARNING_CATEGORY,
                payload: EventPayload::Warning {
                    warning: self.first(warning_messages),
                },
            },
            (_, n) if n > 1 => DerivedEvent::Warning {
                category: WARNING_CATEGORY,
                payload: EventPayload::Count { count: n },
            },
            _ => DerivedEvent::None,
        }
    }

    fn first(&self, messages: &[String]) -> String {
        messages
            .first()
            .map(|m| self.truncate.truncate(m))
            .unwrap_or_default()
    }
}
