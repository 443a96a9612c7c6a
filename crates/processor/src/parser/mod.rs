/// Report parsing and normalization module
///
/// Turns raw client-submitted report bytes into a [`CanonicalRecord`].
///
/// # Architecture
///
/// - `traits.rs`: Core traits for detectors and decoders
/// - `detector.rs`: Format detection orchestrator (first match wins)
/// - `formats/`: Plist, full YAML and minimal flat-YAML implementations
/// - `chain.rs`: Decoder fallback chains and the [`ReportParser`] entry point
///
/// # Fallback
///
/// A failing decoder never fails the request on its own: plist failures
/// fall through to the YAML tiers, and only exhaustion of every tier
/// yields `None`.

pub mod traits;
pub mod detector;
pub mod chain;
pub mod formats;
pub mod model;

// Re-export commonly used types
pub use chain::{DecoderChain, ParsedReport, ReportParser};
pub use model::{CanonicalRecord, DecodeError, ReportFormat, Value};
pub use traits::{FormatDetector, ReportDecoder};
