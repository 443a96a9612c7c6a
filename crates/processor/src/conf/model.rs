//! Model: ProcessorConfig and related structs.

use serde::{Deserialize, Serialize};

use crate::client::truncate::DEFAULT_TRUNCATE_LENGTH;
use crate::filter::Patterns;
use crate::report::mapper::{default_entries, TranslationEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub truncate_length: usize,
    pub data_dir: String,
    pub suppression: SuppressionConfig,
    pub translate: Vec<TranslationEntry>,
}

/// Case-insensitive regular expressions per message category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            truncate_length: DEFAULT_TRUNCATE_LENGTH,
            data_dir: "./data".to_string(),
            suppression: SuppressionConfig::default(),
            translate: default_entries(),
        }
    }
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            errors: Patterns::network_errors(),
            warnings: Vec::new(),
        }
    }
}
