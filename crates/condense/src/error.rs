//! Error types.
//!
//! [`SummarizeError`] is what callers of [`Engine::run`](crate::Engine::run)
//! see. [`StrategyError`] stays inside the engine: a failing transformer call
//! is recovered per chunk and only shows up as a `fallback` flag.

use std::time::Duration;

use thiserror::Error;

/// A request-level failure.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Bad client input. Rejected before any work starts.
    #[error("{0}")]
    Validation(String),

    /// An engine invariant was broken (chunk coverage, worker panic).
    #[error("internal error: {0}")]
    Internal(String),
}

impl SummarizeError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A single strategy invocation failed.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Request(String),

    /// The model endpoint answered with a non-success status.
    #[error("model endpoint HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The endpoint answered 2xx but the body was not a summary.
    #[error("malformed model response: {0}")]
    Malformed(String),

    /// The call did not finish within its deadline.
    #[error("timed out after {0:.1?}")]
    Timeout(Duration),
}

impl StrategyError {
    /// Whether retrying the same call may succeed.
    ///
    /// Rate limits, server errors, and network failures are transient.
    /// Model endpoints also answer 503 while weights are loading.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Malformed(_) => false,
        }
    }
}

impl From<reqwest::Error> for StrategyError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Request(format!("timed out: {error}"))
        } else {
            Self::Request(error.to_string())
        }
    }
}
