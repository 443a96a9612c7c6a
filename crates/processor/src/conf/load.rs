//! Load: config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::{ProcessorConfig, SuppressionConfig};
use crate::filter::SuppressionRules;
use crate::report::mapper::default_entries;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/munkireport/processor.toml";

impl ProcessorConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("PROCESSOR_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::from_env()
        };

        // Environment variables override file config
        if let Some(length) = env_parse("PROCESSOR_TRUNCATE_LENGTH") {
            config.truncate_length = length;
        }
        if let Ok(dir) = std::env::var("PROCESSOR_DATA_DIR") {
            config.data_dir = dir;
        }

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: ProcessorConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with sensible defaults.
    /// Suppression rules and the translation table only come from a file.
    pub fn from_env() -> Self {
        Self {
            truncate_length: env_parse("PROCESSOR_TRUNCATE_LENGTH")
                .unwrap_or(crate::client::truncate::DEFAULT_TRUNCATE_LENGTH),
            data_dir: std::env::var("PROCESSOR_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            suppression: SuppressionConfig::default(),
            translate: default_entries(),
        }
    }

    /// Validate that configuration values are sane and every pattern compiles
    pub fn validate(&self) -> Result<(), String> {
        if self.truncate_length == 0 {
            return Err("truncate_length must be > 0".to_string());
        }
        if self.data_dir.is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        for entry in &self.translate {
            if entry.source.is_empty() {
                return Err(format!(
                    "translate entry for {} has an empty source key",
                    entry.target.as_str()
                ));
            }
        }
        self.suppression.validate()
    }
}

impl SuppressionConfig {
    pub fn compile(&self) -> Result<SuppressionRules, crate::filter::FilterError> {
        SuppressionRules::from_patterns(&self.errors, &self.warnings)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.compile().map(|_| ()).map_err(|e| format!("suppression: {}", e))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
