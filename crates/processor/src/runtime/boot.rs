//! Boot: logging init, config load, processor construction.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::clock::SystemClock;
use crate::client::truncate::{MaxLength, Truncate};
use crate::conf::ProcessorConfig;
use crate::filter::FilterError;
use crate::report::{EventDeriver, MessageClassifier, RecordMapper, TranslationTable};
use crate::service::ReportProcessor;

/// Initialise the tracing / logging subsystem.
///
/// Output goes to stderr so stdout stays free for command results.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Assemble a processor from configuration. Fails only on an invalid
/// suppression pattern.
pub fn build_processor(config: &ProcessorConfig) -> Result<ReportProcessor, FilterError> {
    let rules = config.suppression.compile()?;
    let truncate: Arc<dyn Truncate> = Arc::new(MaxLength::new(config.truncate_length));

    Ok(ReportProcessor::new(
        RecordMapper::new(TranslationTable::new(config.translate.clone())),
        MessageClassifier::new(rules),
        EventDeriver::new(truncate),
        Arc::new(SystemClock),
    ))
}

/// Load and validate config, then build the processor.
///
/// Returns `(ReportProcessor, ProcessorConfig)` on success.
pub fn boot() -> Result<(ReportProcessor, ProcessorConfig), Box<dyn std::error::Error>> {
    info!("Starting munki report processor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file or env)
    let config = ProcessorConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!(
        "Loaded configuration: data_dir={}, truncate_length={}",
        config.data_dir, config.truncate_length
    );
    info!(
        "Suppression: errors={}, warnings={}, translate entries={}",
        config.suppression.errors.len(),
        config.suppression.warnings.len(),
        config.translate.len()
    );

    let processor = build_processor(&config)?;
    Ok((processor, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::MemoryStore;
    use crate::report::{EventPayload, RequestContext};
    use bytes::Bytes;

    const YAML: &str = "ManifestName: lab\nErrors:\n  - disk full\nWarnings: []\n";

    #[test]
    fn test_build_processor_from_default_config() {
        let processor = build_processor(&ProcessorConfig::default()).unwrap();
        let processed = processor
            .process(Some(Bytes::from_static(YAML.as_bytes())), &RequestContext::new("C02X"))
            .unwrap();
        assert_eq!(processed.report.error_count(), 1);
        assert_eq!(
            processed.event.payload(),
            Some(&EventPayload::Error { error: "disk full".into() })
        );
    }

    #[test]
    fn test_build_processor_honours_truncate_length() {
        let config = ProcessorConfig {
            truncate_length: 4,
            ..Default::default()
        };
        let processor = build_processor(&config).unwrap();
        let store = MemoryStore::new();
        let outcome = processor
            .run(
                Some(Bytes::from_static(YAML.as_bytes())),
                &RequestContext::new("C02X"),
                &store,
                &store,
            )
            .unwrap();
        assert_eq!(
            outcome.event.payload(),
            Some(&EventPayload::Error { error: "disk...".into() })
        );
    }

    #[test]
    fn test_build_processor_suppresses_configured_errors() {
        let mut config = ProcessorConfig::default();
        config.suppression.errors = vec!["^disk".to_string()];
        let processor = build_processor(&config).unwrap();
        let processed = processor
            .process(Some(Bytes::from_static(YAML.as_bytes())), &RequestContext::new("C02X"))
            .unwrap();
        assert_eq!(processed.report.error_count(), 0);
        assert!(processed.event.is_delete());
    }

    #[test]
    fn test_build_processor_rejects_bad_pattern() {
        let mut config = ProcessorConfig::default();
        config.suppression.errors = vec!["(".to_string()];
        assert!(build_processor(&config).is_err());
    }
}
