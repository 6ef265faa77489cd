//! Timeout helpers
//!
//! Wraps async operations so that expiry surfaces as the timeout variant of
//! an upstream error.
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let text = with_timeout(
//!     Duration::from_secs(15),
//!     async { /* completion */ },
//!     "completion",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{AdventureError, Result};

/// Execute an async operation with a timeout
///
/// Returns an upstream timeout error if the operation doesn't complete within
/// the specified duration. The future is dropped on expiry.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(AdventureError::timeout(operation_name, timeout)),
    }
}
