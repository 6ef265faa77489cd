//! AI Integration Layer
//!
//! Completion service access and model reply handling.

pub mod invoker;
pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use invoker::{LlmInvoker, WorkerPool};
pub use prompt::{PromptTemplates, VENUE_INTENT_PROMPT};
pub use provider::{
    ChatMessage, CompletionOutput, DeferredCompletion, MessageRole, OperationHandle,
    SharedProvider, TokenUsage, YandexGptProvider, create_provider,
};
pub use timeout::with_timeout;
pub use validation::{coerce_radius, extract_record, parse_reply, sanitize_intent};
