use std::path::Path;
use std::time::Duration;

use droidloc::BatchOptions;
use droidloc::batch::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT};
use serde::{Deserialize, Serialize};

use crate::validation::validate_language_code;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.json";

fn default_source_language() -> String {
    "en".to_string()
}

fn default_cache_file() -> String {
    "translations_cache.json".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default)]
    pub target_languages: Vec<String>,
    /// Accepted for compatibility; translations are not cached.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_languages: Vec::new(),
            cache_file: default_cache_file(),
            batch_size: default_batch_size(),
            max_concurrency: default_max_concurrency(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl TranslateConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            batch_size: self.batch_size,
            max_concurrency: self.max_concurrency,
            request_timeout: Duration::from_secs(self.timeout_seconds),
        }
    }

    /// Checks language codes and batching limits.
    pub fn validate(&self) -> Result<(), String> {
        validate_language_code(&self.source_language)?;
        for lang in &self.target_languages {
            validate_language_code(lang)?;
        }
        self.batch_options().validate().map_err(|e| e.to_string())
    }
}
