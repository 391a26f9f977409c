//! Forge error and retry-policy types.
//!
//! [`ForgeError`] covers every way a call to the Git forge can fail. Each
//! workflow decides per call site whether a failure degrades a single field
//! (`Unknown` / `false`), a single repository (`status = error`), or the run.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any error type that participates
//! in retry decisions must be able to produce a [`RetryPolicy`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// ## Rules
///
/// - `Retryable`: transport failures and 5xx responses.
/// - `NonRetryable`: 4xx responses, malformed bodies, exhausted retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// caller's own fixed delay.
        after: Option<Duration>,
    },
    /// The operation must not be retried.
    NonRetryable,
}

impl RetryPolicy {
    /// Classifies an HTTP status code: server errors (>= 500) are transient.
    pub fn for_status(status: u16) -> Self {
        if status >= 500 {
            RetryPolicy::Retryable { after: None }
        } else {
            RetryPolicy::NonRetryable
        }
    }

    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetryPolicy::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Forge errors
// ---------------------------------------------------------------------------

/// Errors produced by a [`crate::Forge`] implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForgeError {
    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("Request to {url} failed: {message}")]
    Transport {
        /// Target URL.
        url: String,
        /// Underlying transport error message.
        message: String,
    },

    /// Every allowed attempt ended in a transient failure.
    #[error("Failed after {attempts} retries: {url}")]
    RetriesExhausted {
        /// Target URL.
        url: String,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The forge answered with a status the caller does not accept.
    #[error("Unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse {
        /// Target URL.
        url: String,
        /// Decoder error message.
        message: String,
    },

    /// The request could not be built (bad base URL, invalid header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ForgeError {
    /// Whether the failed call may be re-issued unchanged.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            ForgeError::Transport { .. } => RetryPolicy::Retryable { after: None },
            ForgeError::UnexpectedStatus { status, .. } => RetryPolicy::for_status(*status),
            ForgeError::RetriesExhausted { .. }
            | ForgeError::MalformedResponse { .. }
            | ForgeError::InvalidRequest(_) => RetryPolicy::NonRetryable,
        }
    }
}
