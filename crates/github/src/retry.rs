//! Bounded retry around [`HttpTransport`].
//!
//! Transport failures and 5xx responses are retried with a fixed delay
//! between attempts; no growth, no jitter. Any response below 500 is returned
//! to the caller as-is, so 4xx handling stays with the endpoint that knows
//! what a 404 means.

use std::time::Duration;

use tracing::warn;

use policy::{ForgeError, RetryPolicy};

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;

/// Attempt limit and inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Pause between two attempts.
    pub delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Issues requests through a transport, retrying transient failures.
#[derive(Debug, Clone)]
pub struct RetryingClient<T> {
    transport: T,
    settings: RetrySettings,
}

impl<T: HttpTransport> RetryingClient<T> {
    pub fn new(transport: T, settings: RetrySettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Sends `request`, retrying on transport errors and 5xx responses.
    ///
    /// Returns the first response with a status below 500, or
    /// [`ForgeError::RetriesExhausted`] naming the URL once every attempt failed.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ForgeError> {
        let attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.transport.execute(request).await {
                Ok(response) => {
                    if !RetryPolicy::for_status(response.status).is_retryable() {
                        return Ok(response);
                    }
                    warn!(
                        url = %request.url,
                        status = response.status,
                        attempt,
                        "Retryable error status"
                    );
                }
                Err(err) => {
                    if !err.retry_policy().is_retryable() {
                        return Err(err);
                    }
                    warn!(url = %request.url, attempt, error = %err, "Request failed");
                }
            }

            if attempt < attempts && !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
        }

        Err(ForgeError::RetriesExhausted {
            url: request.url.clone(),
            attempts,
        })
    }

    /// Sends `request` exactly once.
    ///
    /// Used for non-idempotent calls (branch and pull request creation): a
    /// 5xx may hide a mutation that already happened, so it is reported as
    /// [`ForgeError::UnexpectedStatus`] instead of being replayed.
    pub async fn send_once(&self, request: &ApiRequest) -> Result<ApiResponse, ForgeError> {
        let response = self.transport.execute(request).await?;
        if RetryPolicy::for_status(response.status).is_retryable() {
            return Err(response.into_unexpected());
        }
        Ok(response)
    }
}
