//! Query Normalization Pipeline
//!
//! Sequences one request: invoke the model, extract its JSON payload,
//! sanitize it, and wrap the result with a request id and timing.
//!
//! Only the invoker can fail in normal operation. Extraction and
//! sanitization are total; a panic inside them is still caught here and
//! reported as an internal error rather than taking the caller down.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::ai::{LlmInvoker, SharedProvider, create_provider, parse_reply};
use crate::config::LlmConfig;
use crate::types::{AdventureError, ParseResponse, ParsedIntent, Result, UserQuery};

/// Turns user queries into parsed intents. Stateless; share it behind an `Arc`.
pub struct IntentPipeline {
    invoker: LlmInvoker,
}

impl IntentPipeline {
    pub fn new(invoker: LlmInvoker) -> Self {
        Self { invoker }
    }

    /// Build the pipeline with the configured provider
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = create_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    pub fn with_provider(provider: SharedProvider, config: &LlmConfig) -> Self {
        Self::new(LlmInvoker::from_config(provider, config))
    }

    /// Parse one query.
    ///
    /// Fails only with `Upstream` (completion service) or `Internal` errors.
    pub async fn process(&self, query: &UserQuery) -> Result<ParseResponse> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "parse",
            %request_id,
            user_id = query.user_id(),
            provider = self.invoker.provider_name()
        );

        async {
            let reply = self.invoker.invoke(query.text()).await.inspect_err(|e| {
                warn!("Completion failed: {}", e);
            })?;

            let parsed_query = normalize(&reply)?;
            let processing_time_ms = started.elapsed().as_millis() as u64;
            let response =
                ParseResponse::new(request_id, query.user_id(), parsed_query, processing_time_ms);

            info!(processing_time_ms, "Query parsed");
            Ok::<_, AdventureError>(response)
        }
        .instrument(span)
        .await
    }
}

/// Extract and sanitize, converting a panic into an internal error
fn normalize(reply: &str) -> Result<ParsedIntent> {
    catch_unwind(AssertUnwindSafe(|| parse_reply(reply))).map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        AdventureError::Internal(format!("reply normalization failed: {}", message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::WorkerPool;
    use crate::ai::provider::scripted::ScriptedProvider;
    use crate::types::{ErrorCategory, PriceLevel};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn pipeline(provider: ScriptedProvider, timeout: Duration) -> IntentPipeline {
        IntentPipeline::new(LlmInvoker::new(
            Arc::new(provider),
            WorkerPool::new(4),
            timeout,
        ))
    }

    #[tokio::test]
    async fn test_quiet_bar_with_friends() {
        let reply = r#"{"intent":["бар"],"categories":[],"radius":5000,"mood":"спокойное","company":"друзья","time_context":"вечер","price_level":"medium","feature_tags":["пиво"]}"#;
        let pipeline = pipeline(ScriptedProvider::replying(reply), Duration::from_secs(1));
        let query = UserQuery::new(12345, "Хочу в тихий бар с друзьями").unwrap();

        let response = pipeline.process(&query).await.unwrap();

        assert_eq!(response.user_id, 12345);
        assert_eq!(response.request_id.get_version_num(), 4);
        assert_eq!(
            response.parsed_query,
            ParsedIntent {
                intent: vec!["бар".into()],
                categories: vec![],
                radius: Some(5000),
                mood: Some("спокойное".into()),
                company: Some("друзья".into()),
                time_context: Some("вечер".into()),
                price_level: Some(PriceLevel::Medium),
                feature_tags: vec!["пиво".into()],
            }
        );
    }

    #[tokio::test]
    async fn test_each_request_gets_new_id() {
        let pipeline = pipeline(ScriptedProvider::replying("{}"), Duration::from_secs(1));
        let query = UserQuery::new(1, "кафе").unwrap();

        let a = pipeline.process(&query).await.unwrap();
        let b = pipeline.process(&query).await.unwrap();
        assert_ne!(a.request_id, b.request_id);
    }

    /// Collects the `request_id` field of every span opened
    #[derive(Clone, Default)]
    struct SpanRequestIds(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> Layer<S> for SpanRequestIds {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            struct RequestId<'a>(&'a mut Vec<String>);

            impl Visit for RequestId<'_> {
                fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                    if field.name() == "request_id" {
                        self.0.push(format!("{:?}", value));
                    }
                }
            }

            attrs.record(&mut RequestId(&mut self.0.lock().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_span_carries_response_request_id() {
        let ids = SpanRequestIds::default();
        let _subscriber =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(ids.clone()));

        let pipeline = pipeline(ScriptedProvider::replying("{}"), Duration::from_secs(1));
        let query = UserQuery::new(1, "кафе").unwrap();
        let response = pipeline.process(&query).await.unwrap();

        assert_eq!(
            *ids.0.lock().unwrap(),
            vec![response.request_id.to_string()]
        );
    }

    #[tokio::test]
    async fn test_bare_number_reply_gives_default_intent() {
        let pipeline = pipeline(ScriptedProvider::replying("150"), Duration::from_secs(1));
        let query = UserQuery::new(1, "что-нибудь").unwrap();

        let response = pipeline.process(&query).await.unwrap();
        assert_eq!(response.parsed_query, ParsedIntent::default());
    }

    #[tokio::test]
    async fn test_empty_reply_gives_default_intent() {
        let pipeline = pipeline(ScriptedProvider::silent(), Duration::from_secs(1));
        let query = UserQuery::new(1, "что-нибудь").unwrap();

        let response = pipeline.process(&query).await.unwrap();
        assert_eq!(response.parsed_query, ParsedIntent::default());
    }

    #[tokio::test]
    async fn test_processing_time_covers_upstream_wait() {
        let pipeline = pipeline(
            ScriptedProvider::replying("{}").with_delay(Duration::from_millis(30)),
            Duration::from_secs(1),
        );
        let query = UserQuery::new(1, "кафе").unwrap();

        let response = pipeline.process(&query).await.unwrap();
        assert!(response.processing_time_ms >= 30);
    }

    #[tokio::test]
    async fn test_timeout_is_upstream_error() {
        let pipeline = pipeline(
            ScriptedProvider::replying("{}").with_delay(Duration::from_secs(5)),
            Duration::from_millis(50),
        );
        let query = UserQuery::new(1, "кафе").unwrap();

        let err = pipeline.process(&query).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let pipeline = pipeline(
            ScriptedProvider::failing(ErrorCategory::Network),
            Duration::from_secs(1),
        );
        let query = UserQuery::new(1, "кафе").unwrap();

        match pipeline.process(&query).await {
            Err(AdventureError::Upstream(e)) => assert_eq!(e.category, ErrorCategory::Network),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(normalize("").unwrap(), ParsedIntent::default());
        assert_eq!(normalize("```json\n{\"radius\": 1}\n```").unwrap().radius, Some(100));
    }
}
