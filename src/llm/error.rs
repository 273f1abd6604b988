//! LLM error types.

use thiserror::Error;

/// Errors that can occur when making LLM API calls.
///
/// Failures surface to the caller as-is; there is no retry or backoff layer
/// in front of the providers.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request failed
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
}
