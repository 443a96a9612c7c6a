//! Report module: from canonical record to normalized report and event.
//!
//! - `mapper.rs`: translation table and field extraction
//! - `classify.rs`: error/warning suppression
//! - `event.rs`: summary event derivation
//! - `extract.rs`: client-side report reduction
//! - `model.rs`: report, event and context types

pub mod classify;
pub mod event;
pub mod extract;
pub mod mapper;
pub mod model;

pub use classify::MessageClassifier;
pub use event::EventDeriver;
pub use extract::extract_report;
pub use mapper::{RecordMapper, TranslationEntry, TranslationTable};
pub use model::{DerivedEvent, EventPayload, NormalizedReport, ReportField, RequestContext};
