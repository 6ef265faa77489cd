//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/adventure/) and project (.adventure/) level configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{geosearch, llm};
use crate::types::{AdventureError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Verbose logging without passing --verbose
    pub debug: bool,

    /// Completion service settings
    pub llm: LlmConfig,

    /// Organization search settings
    pub geosearch: GeosearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            debug: false,
            llm: LlmConfig::default(),
            geosearch: GeosearchConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `AdventureError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(AdventureError::Config(format!(
                "LLM temperature must be between 0.0 and 1.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(AdventureError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.poll_interval_ms == 0 {
            return Err(AdventureError::Config(
                "LLM poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_concurrent_jobs == 0 {
            return Err(AdventureError::Config(
                "LLM max_concurrent_jobs must be greater than 0".to_string(),
            ));
        }

        if self.geosearch.timeout_secs == 0 {
            return Err(AdventureError::Config(
                "Geosearch timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Completion service configuration.
///
/// The API key is never serialized and is redacted from debug output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (only "yandexgpt" is supported)
    pub provider: String,
    /// Model name within the folder
    pub model: String,
    /// Cloud folder the model is billed to (falls back to YANDEX_FOLDER_ID)
    pub folder_id: Option<String>,
    /// API key (falls back to YANDEX_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Completion API base URL
    pub api_base: String,
    /// Operation API base URL
    pub operation_base: String,
    /// Bound on a whole deferred completion, submit through result
    pub timeout_secs: u64,
    /// Delay between operation status polls
    pub poll_interval_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Worker pool capacity for concurrent completion jobs
    pub max_concurrent_jobs: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("folder_id", &self.folder_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("operation_base", &self.operation_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_concurrent_jobs", &self.max_concurrent_jobs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "yandexgpt".to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            folder_id: None,
            api_key: None,
            api_base: llm::DEFAULT_API_BASE.to_string(),
            operation_base: llm::DEFAULT_OPERATION_BASE.to_string(),
            timeout_secs: llm::DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: llm::DEFAULT_POLL_INTERVAL_MS,
            temperature: llm::DEFAULT_TEMPERATURE,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
            max_concurrent_jobs: llm::DEFAULT_MAX_CONCURRENT_JOBS,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// Geosearch Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeosearchConfig {
    /// API key (falls back to GEO_SEARCH_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
    /// Results per page for parameterized searches
    pub results: u32,
}

impl std::fmt::Debug for GeosearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeosearchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("results", &self.results)
            .finish()
    }
}

impl Default for GeosearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: geosearch::DEFAULT_API_BASE.to_string(),
            timeout_secs: geosearch::DEFAULT_TIMEOUT_SECS,
            results: geosearch::DEFAULT_RESULTS,
        }
    }
}
