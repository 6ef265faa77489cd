//! Scripted provider for tests: fixed reply, optional delay or failure.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ChatMessage, CompletionOutput, DeferredCompletion, OperationHandle};
use crate::types::{ErrorCategory, LlmError, Result};

#[derive(Default)]
pub struct ScriptedProvider {
    reply: Option<String>,
    delay: Duration,
    failure: Option<ErrorCategory>,
    pub submitted: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Default::default()
        }
    }

    /// Completes without any alternative text
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn failing(category: ErrorCategory) -> Self {
        Self {
            failure: Some(category),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DeferredCompletion for ScriptedProvider {
    async fn submit(&self, messages: &[ChatMessage]) -> Result<OperationHandle> {
        let n = self.submitted.fetch_add(1, Ordering::SeqCst);
        if let Some(category) = self.failure {
            return Err(LlmError::with_provider(category, "scripted failure", "scripted").into());
        }
        assert_eq!(messages.len(), 2);
        Ok(OperationHandle::new(format!("op-{}", n)))
    }

    async fn wait(&self, _handle: &OperationHandle) -> Result<CompletionOutput> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(CompletionOutput {
            text: self.reply.clone(),
            ..Default::default()
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}
