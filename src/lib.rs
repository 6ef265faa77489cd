//! Adventure - Venue Request Normalization
//!
//! Turns free-form natural-language venue requests ("Хочу в тихий бар с
//! друзьями") into a structured, bounded search intent by asking a hosted
//! language model and sanitizing whatever it answers.
//!
//! ## Core Features
//!
//! - **Deferred completion**: submit/poll against YandexGPT on a bounded worker pool
//! - **Hard deadline**: every model call is cut off after a fixed timeout
//! - **Fail-soft parsing**: malformed model output degrades to a default intent
//! - **Geosearch pass-through**: raw organization search for manual lookups
//!
//! ## Quick Start
//!
//! ```ignore
//! use adventure::{ConfigLoader, IntentPipeline, UserQuery};
//!
//! let config = ConfigLoader::load()?;
//! let pipeline = IntentPipeline::from_config(&config.llm)?;
//! let query = UserQuery::new(42, "Хочу в тихий бар с друзьями")?;
//! let response = pipeline.process(&query).await?;
//! println!("{:?}", response.parsed_query);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt, completion provider, invoker, reply validation
//! - [`pipeline`]: per-request orchestration
//! - [`geosearch`]: organization search client
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod geosearch;
pub mod pipeline;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, GeosearchConfig, LlmConfig};

// Types
pub use types::{
    AdventureError, ErrorCategory, LlmError, LooselyTypedRecord, ParseResponse, ParsedIntent,
    PriceLevel, Result, UserQuery,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::IntentPipeline;

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    DeferredCompletion, LlmInvoker, PromptTemplates, WorkerPool, YandexGptProvider, parse_reply,
    with_timeout,
};

// =============================================================================
// Geosearch Re-exports
// =============================================================================

pub use geosearch::{GeosearchClient, SearchArea};
