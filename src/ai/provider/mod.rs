//! Completion Provider Abstraction
//!
//! Defines the `DeferredCompletion` trait: a completion is submitted as a
//! deferred job that yields an operation handle, and the result is collected
//! by a separate wait on that handle. The invoker drives both phases.
//!
//! ## Modules
//!
//! - `yandex`: YandexGPT Foundation Models over the async completion API

#[cfg(test)]
pub(crate) mod scripted;
mod yandex;

pub use yandex::YandexGptProvider;
pub(crate) use yandex::{credential, validate_endpoint};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::config::LlmConfig;
use crate::types::{AdventureError, Result};

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// One entry of the exchange sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }
}

// =============================================================================
// Deferred Job Types
// =============================================================================

/// Handle to a submitted completion job
#[derive(Debug, Clone)]
pub struct OperationHandle {
    /// Operation identifier assigned by the service
    pub id: String,
    pub submitted_at: Instant,
}

impl OperationHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            submitted_at: Instant::now(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (completion)
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Finished completion job
#[derive(Debug, Clone, Default)]
pub struct CompletionOutput {
    /// Reply text; `None` when the service returned no alternative text
    pub text: Option<String>,
    pub usage: TokenUsage,
    pub model_version: Option<String>,
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Completion service reached through submit/wait deferred jobs
#[async_trait]
pub trait DeferredCompletion: Send + Sync {
    /// Submit the exchange as a deferred job
    async fn submit(&self, messages: &[ChatMessage]) -> Result<OperationHandle>;

    /// Wait for a submitted job to finish.
    ///
    /// Implementations may wait indefinitely; callers bound the wait.
    async fn wait(&self, handle: &OperationHandle) -> Result<CompletionOutput>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Shared provider type for concurrent access across requests.
pub type SharedProvider = Arc<dyn DeferredCompletion>;

/// Create a shared provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "yandexgpt" => Ok(Arc::new(YandexGptProvider::new(config)?)),
        _ => Err(AdventureError::Config(format!(
            "Unknown provider: {}. Supported: yandexgpt",
            config.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let value = serde_json::to_value(ChatMessage::system("rules")).unwrap();
        assert_eq!(value, serde_json::json!({"role": "system", "text": "rules"}));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(AdventureError::Config(_))
        ));
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 40,
        };
        assert_eq!(usage.total(), 160);
    }
}
