//! Client module: collaborators consumed by the processor.
//!
//! - `store.rs`: persistence and event-store traits
//! - `fake.rs`: in-memory test double
//! - `file.rs`: JSON file store used by the CLI
//! - `clock.rs`, `truncate.rs`: timestamp and truncation collaborators

pub mod clock;
pub mod fake;
pub mod file;
pub mod store;
pub mod truncate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use fake::MemoryStore;
pub use file::JsonFileStore;
pub use store::{EventStore, ReportStore, StoreError, StoredEvent, StoredRecord};
pub use truncate::{MaxLength, Truncate};
