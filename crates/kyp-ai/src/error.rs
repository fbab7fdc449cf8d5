use std::time::Duration;

use thiserror::Error;

/// Why a record could not be classified. Always recoverable at the batch level.
#[derive(Debug, Error)]
pub enum AiError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("classifier returned no content")]
    EmptyResponse,

    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),
}
