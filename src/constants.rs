//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Search radius bounds applied to parsed intents
pub mod radius {
    /// Smallest radius accepted (meters)
    pub const MIN_METERS: i64 = 100;

    /// Largest radius accepted (meters)
    pub const MAX_METERS: i64 = 50_000;

    /// Substituted when the model returns a radius that is not a number
    pub const FALLBACK_METERS: i64 = 5_000;
}

/// User query bounds
pub mod query {
    /// Minimum query length (characters)
    pub const MIN_TEXT_CHARS: usize = 1;

    /// Maximum query length (characters)
    pub const MAX_TEXT_CHARS: usize = 1000;
}

/// Completion service constants
pub mod llm {
    /// Completion API base URL
    pub const DEFAULT_API_BASE: &str = "https://llm.api.cloud.yandex.net";

    /// Operation (deferred job) API base URL
    pub const DEFAULT_OPERATION_BASE: &str = "https://operation.api.cloud.yandex.net";

    /// Default model name
    pub const DEFAULT_MODEL: &str = "yandexgpt";

    /// Hard bound on waiting for a deferred completion (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

    /// Delay between operation status polls (milliseconds)
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Default completion length limit (tokens)
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;

    /// Default worker pool capacity for in-flight completion jobs
    pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 16;

    /// Environment fallbacks for credentials
    pub const FOLDER_ID_ENV: &str = "YANDEX_FOLDER_ID";
    pub const API_KEY_ENV: &str = "YANDEX_API_KEY";
}

/// Geosearch constants
pub mod geosearch {
    /// Organization search API base URL
    pub const DEFAULT_API_BASE: &str = "https://search-maps.yandex.ru/v1/";

    /// Request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Results per page for parameterized searches
    pub const DEFAULT_RESULTS: u32 = 10;

    /// Results per page for text-only searches
    pub const RAW_SEARCH_RESULTS: u32 = 20;

    /// Approximate meters per degree, used to turn a radius into a span
    pub const METERS_PER_DEGREE: f64 = 111_000.0;

    /// Response language
    pub const LANG: &str = "ru_RU";

    /// Search type (organizations)
    pub const SEARCH_TYPE: &str = "biz";

    /// Environment fallback for the API key
    pub const API_KEY_ENV: &str = "GEO_SEARCH_KEY";
}
