//! YandexGPT Provider
//!
//! Completion provider over the Foundation Models async API. A request is
//! posted to `completionAsync`, which answers with an operation; the result
//! is then polled from the operation service until the operation is done.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ChatMessage, CompletionOutput, DeferredCompletion, OperationHandle, TokenUsage};
use crate::config::LlmConfig;
use crate::constants::llm::{API_KEY_ENV, FOLDER_ID_ENV};
use crate::types::{AdventureError, ErrorClassifier, LlmError, Result};

const PROVIDER_NAME: &str = "yandexgpt";
const COMPLETION_PATH: &str = "foundationModels/v1/completionAsync";

/// YandexGPT provider with secure API key handling
pub struct YandexGptProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    folder_id: String,
    model: String,
    api_base: String,
    operation_base: String,
    temperature: f32,
    max_tokens: u32,
    poll_interval: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for YandexGptProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexGptProvider")
            .field("api_key", &"[REDACTED]")
            .field("folder_id", &self.folder_id)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("operation_base", &self.operation_base)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl YandexGptProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let folder_id = credential(config.folder_id.clone(), FOLDER_ID_ENV).ok_or_else(|| {
            AdventureError::Config(format!(
                "Folder id not found. Set {} env var or llm.folder_id in config",
                FOLDER_ID_ENV
            ))
        })?;

        let api_key = credential(config.api_key.clone(), API_KEY_ENV).ok_or_else(|| {
            AdventureError::Config(format!(
                "API key not found. Set {} env var or llm.api_key in config",
                API_KEY_ENV
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AdventureError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            folder_id,
            model: config.model.clone(),
            api_base: validate_endpoint(&config.api_base)?,
            operation_base: validate_endpoint(&config.operation_base)?,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            poll_interval: config.poll_interval(),
            client,
        })
    }

    /// Fully qualified model URI, e.g. `gpt://<folder>/yandexgpt/latest`
    fn model_uri(&self) -> String {
        if self.model.contains("://") {
            self.model.clone()
        } else {
            format!("gpt://{}/{}/latest", self.folder_id, self.model)
        }
    }

    fn build_request<'a>(&self, messages: &'a [ChatMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model_uri: self.model_uri(),
            completion_options: CompletionOptions {
                stream: false,
                temperature: self.temperature,
                max_tokens: self.max_tokens.to_string(),
            },
            messages,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(
                "Authorization",
                format!("Api-Key {}", self.api_key.expose_secret()),
            )
            .header("x-folder-id", &self.folder_id)
    }

    /// Turn a non-success HTTP status into a classified upstream error
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ErrorClassifier::classify_http_status(
            status.as_u16(),
            &format!("YandexGPT API error ({}): {}", status, body),
            PROVIDER_NAME,
        )
        .into())
    }

    async fn fetch_operation(&self, id: &str) -> Result<Operation> {
        let url = format!("{}/operations/{}", self.operation_base, id);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        let response = Self::check_status(response).await?;
        response.json().await.map_err(|e| {
            LlmError::with_provider(
                crate::types::ErrorCategory::Unknown,
                format!("Failed to parse operation status: {}", e),
                PROVIDER_NAME,
            )
            .into()
        })
    }
}

#[async_trait]
impl DeferredCompletion for YandexGptProvider {
    async fn submit(&self, messages: &[ChatMessage]) -> Result<OperationHandle> {
        info!(
            "Submitting completion to YandexGPT (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let url = format!("{}/{}", self.api_base, COMPLETION_PATH);
        let request = self.build_request(messages);

        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER_NAME))?;

        let response = Self::check_status(response).await?;
        let operation: Operation = response.json().await.map_err(|e| {
            LlmError::with_provider(
                crate::types::ErrorCategory::Unknown,
                format!("Failed to parse submitted operation: {}", e),
                PROVIDER_NAME,
            )
        })?;

        debug!("Completion submitted as operation {}", operation.id);
        Ok(OperationHandle::new(operation.id))
    }

    async fn wait(&self, handle: &OperationHandle) -> Result<CompletionOutput> {
        loop {
            let operation = self.fetch_operation(&handle.id).await?;

            if !operation.done {
                debug!("Operation {} still running", handle.id);
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }

            if let Some(error) = operation.error {
                warn!(
                    "Operation {} failed with code {}: {}",
                    handle.id, error.code, error.message
                );
                return Err(ErrorClassifier::classify_operation_code(
                    error.code,
                    &error.message,
                    PROVIDER_NAME,
                )
                .into());
            }

            let output = operation
                .response
                .map(CompletionResponse::into_output)
                .unwrap_or_default();

            debug!(
                "Operation {} done after {:?} (tokens: {})",
                handle.id,
                handle.submitted_at.elapsed(),
                output.usage.total()
            );
            return Ok(output);
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Configured value first, then the environment; blank counts as missing
pub(crate) fn credential(configured: Option<String>, env_var: &str) -> Option<String> {
    configured
        .or_else(|| std::env::var(env_var).ok())
        .filter(|value| !value.trim().is_empty())
}

/// Validate an endpoint URL: http/https only, no trailing slash
pub(crate) fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        AdventureError::Config(format!("Invalid endpoint URL '{}': {}", endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AdventureError::Config(format!(
            "Endpoint must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Counts arrive as int64-as-string; tolerate plain numbers too.
/// Counts beyond `u32::MAX` saturate.
fn token_count(value: Option<&Value>) -> u32 {
    let count = match value {
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    count.map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    model_uri: String,
    completion_options: CompletionOptions,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f32,
    max_tokens: String,
}

#[derive(Debug, Deserialize)]
struct Operation {
    id: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<CompletionResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionResponse {
    #[serde(default)]
    alternatives: Vec<Alternative>,
    #[serde(default)]
    usage: Option<UsageInfo>,
    #[serde(default)]
    model_version: Option<String>,
}

impl CompletionResponse {
    fn into_output(self) -> CompletionOutput {
        let usage = self
            .usage
            .map(|u| TokenUsage {
                input_tokens: token_count(u.input_text_tokens.as_ref()),
                output_tokens: token_count(u.completion_tokens.as_ref()),
            })
            .unwrap_or_default();

        let text = self
            .alternatives
            .into_iter()
            .next()
            .and_then(|alt| alt.message)
            .and_then(|message| message.text);

        CompletionOutput {
            text,
            usage,
            model_version: self.model_version,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    message: Option<AlternativeMessage>,
}

#[derive(Debug, Deserialize)]
struct AlternativeMessage {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageInfo {
    #[serde(default)]
    input_text_tokens: Option<Value>,
    #[serde(default)]
    completion_tokens: Option<Value>,
}
