//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Classes
//!
//! - **Upstream**: the completion service failed, refused credentials or did
//!   not answer in time. The only failure a caller sees once a query is valid.
//! - **Internal**: an unexpected fault inside the pipeline.
//! - **Validation**: the user query itself is out of bounds.
//!
//! Malformed model output is never an error here: extraction and
//! sanitization degrade to defaults instead.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories of upstream (completion service) failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The deferred job did not complete within the configured bound
    Timeout,
    /// Authentication failed (bad API key or folder)
    Auth,
    /// Rate limited by the service
    RateLimit,
    /// Network/connectivity issues
    Network,
    /// Service unavailable or endpoint missing
    Unavailable,
    /// Request rejected as malformed
    BadRequest,
    /// Temporary server-side issues
    Transient,
    /// Unclassified
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Auth => write!(f, "AUTH"),
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Upstream completion error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.category == ErrorCategory::Timeout
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport failures and HTTP statuses onto error categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            401 | 403 => ErrorCategory::Auth,
            429 => ErrorCategory::RateLimit,
            400 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() {
            ErrorCategory::Timeout
        } else if err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &err.to_string(), provider);
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, format!("request failed: {}", err), provider)
    }

    /// Classify an operation error reported by the service after submission.
    ///
    /// Codes follow the gRPC status numbering used by the operation API.
    pub fn classify_operation_code(code: i64, message: &str, provider: &str) -> LlmError {
        let category = match code {
            4 => ErrorCategory::Timeout,
            7 | 16 => ErrorCategory::Auth,
            8 => ErrorCategory::RateLimit,
            3 | 9 | 11 => ErrorCategory::BadRequest,
            5 | 12 => ErrorCategory::Unavailable,
            13 | 14 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum AdventureError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    /// Completion service unreachable, unauthorized or too slow
    #[error("Upstream error: {0}")]
    Upstream(LlmError),

    /// Unexpected fault while turning a reply into an intent
    #[error("Internal error: {0}")]
    Internal(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Invalid query: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Geosearch error: {0}")]
    Geosearch(String),
}

impl From<LlmError> for AdventureError {
    fn from(err: LlmError) -> Self {
        AdventureError::Upstream(err)
    }
}

pub type Result<T> = std::result::Result<T, AdventureError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl AdventureError {
    /// Create the timeout variant of an upstream error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Upstream(LlmError::new(
            ErrorCategory::Timeout,
            format!("{} did not complete within {:?}", operation.into(), duration),
        ))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Upstream(e) if e.is_timeout())
    }

    /// HTTP status an outer request layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            _ => 500,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Timeout.to_string(), "TIMEOUT");
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_http_status() {
        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "yandexgpt");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let forbidden = ErrorClassifier::classify_http_status(403, "Forbidden", "yandexgpt");
        assert_eq!(forbidden.category, ErrorCategory::Auth);

        let rate_limit = ErrorClassifier::classify_http_status(429, "Too many", "yandexgpt");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let server_error = ErrorClassifier::classify_http_status(503, "Unavailable", "yandexgpt");
        assert_eq!(server_error.category, ErrorCategory::Transient);

        let odd = ErrorClassifier::classify_http_status(418, "Teapot", "yandexgpt");
        assert_eq!(odd.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_operation_code() {
        let deadline = ErrorClassifier::classify_operation_code(4, "deadline", "yandexgpt");
        assert_eq!(deadline.category, ErrorCategory::Timeout);

        let denied = ErrorClassifier::classify_operation_code(7, "denied", "yandexgpt");
        assert_eq!(denied.category, ErrorCategory::Auth);

        let invalid = ErrorClassifier::classify_operation_code(3, "bad arg", "yandexgpt");
        assert_eq!(invalid.category, ErrorCategory::BadRequest);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::Auth, "Invalid API key", "yandexgpt");
        assert_eq!(err.to_string(), "[yandexgpt:AUTH] Invalid API key");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_timeout_is_upstream() {
        let err = AdventureError::timeout("completion", Duration::from_secs(15));
        assert!(err.is_upstream());
        assert!(err.is_timeout());
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AdventureError::Validation("empty".into()).status_code(), 422);
        assert_eq!(AdventureError::Internal("boom".into()).status_code(), 500);
        let upstream: AdventureError = LlmError::new(ErrorCategory::Auth, "denied").into();
        assert_eq!(upstream.status_code(), 500);
        assert!(!upstream.is_timeout());
    }
}
