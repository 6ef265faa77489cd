//! LLM Invoker
//!
//! Runs the two-phase completion job (submit, then wait on the operation
//! handle) on a bounded worker pool so a slow upstream call never holds up the
//! caller's task. Once a job holds a worker it is bounded by the configured
//! timeout; on expiry the job is dropped and an upstream timeout error is
//! returned. Time spent queued for a worker does not count against it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::prompt::PromptTemplates;
use super::provider::SharedProvider;
use super::timeout::with_timeout;
use crate::config::LlmConfig;
use crate::types::{AdventureError, Result};

// =============================================================================
// Worker Pool
// =============================================================================

/// Bounded pool of completion workers.
///
/// Each job runs as its own tokio task and holds one permit while it runs;
/// jobs beyond capacity queue for a permit.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Workers not currently running a job
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` on a pool worker
    pub fn spawn<T, F>(&self, job: F) -> JoinHandle<Result<T>>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| AdventureError::Internal("worker pool closed".to_string()))?;
            job.await
        })
    }
}

/// Aborts the pooled job when the caller stops waiting for it
struct JobGuard<T>(JoinHandle<T>);

impl<T> Drop for JobGuard<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

// =============================================================================
// Invoker
// =============================================================================

/// Submits a query to the completion service and returns the raw reply text
pub struct LlmInvoker {
    provider: SharedProvider,
    pool: WorkerPool,
    timeout: Duration,
}

impl LlmInvoker {
    pub fn new(provider: SharedProvider, pool: WorkerPool, timeout: Duration) -> Self {
        Self {
            provider,
            pool,
            timeout,
        }
    }

    pub fn from_config(provider: SharedProvider, config: &LlmConfig) -> Self {
        Self::new(
            provider,
            WorkerPool::new(config.max_concurrent_jobs),
            config.timeout(),
        )
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Get the model's reply for `text`, trimmed.
    ///
    /// A completion without text yields an empty string; only upstream
    /// failures and timeouts are errors.
    pub async fn invoke(&self, text: &str) -> Result<String> {
        let messages = PromptTemplates::venue_intent(text);
        let provider = Arc::clone(&self.provider);

        debug!(
            "Dispatching completion to {}/{} ({} of {} workers free)",
            provider.name(),
            provider.model(),
            self.pool.available(),
            self.pool.capacity()
        );

        let timeout = self.timeout;
        let mut job = JobGuard(self.pool.spawn(async move {
            with_timeout(
                timeout,
                async {
                    let handle = provider.submit(&messages).await?;
                    provider.wait(&handle).await
                },
                "completion",
            )
            .await
        }));

        let result = match (&mut job.0).await {
            Ok(result) => result,
            Err(e) => Err(AdventureError::Internal(format!(
                "completion worker failed: {}",
                e
            ))),
        };

        let output = result.inspect_err(|e| {
            if e.is_timeout() {
                warn!("Completion abandoned after {:?}", self.timeout);
            }
        })?;

        debug!(
            "Completion finished (model version: {}, input tokens: {}, output tokens: {})",
            output.model_version.as_deref().unwrap_or("unknown"),
            output.usage.input_tokens,
            output.usage.output_tokens
        );

        Ok(output.text.unwrap_or_default().trim().to_string())
    }
}
