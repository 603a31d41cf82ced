//! Error types for the completion gateway.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when calling the completion endpoint.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport error (includes request timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a structured error response.
    #[error("API error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    /// Rate limited; retry after the given number of seconds.
    #[error("rate limited, retry after {0}s")]
    RateLimited(u64),

    /// The API key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response contained no completion choices.
    #[error("empty completion response")]
    EmptyResponse,
}

/// Structured error body returned by the OpenRouter API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Inner error detail of an API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, rename = "type")]
    pub error_type: String,
    pub message: String,
}
