// src/error.rs
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Missing API keys: {}", .0.join(", "))]
    Configuration(Vec<&'static str>),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}: {detail}")]
    Protocol {
        status: u16,
        url: String,
        detail: String,
    },

    #[error("Invalid JSON in response body: {0}")]
    Decode(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl SourceError {
    /// Classifies a `reqwest` failure raised while sending a request.
    ///
    /// The request URL is dropped from the message since its query string
    /// carries the indicator.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return SourceError::Timeout(timeout);
        }
        let decode = err.is_decode();
        let message = err.without_url().to_string();
        if decode {
            SourceError::Decode(message)
        } else {
            SourceError::Transport(message)
        }
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            SourceError::Configuration(_) => "config",
            SourceError::InvalidUrl { .. } => "config",
            SourceError::InvalidCredential(_) => "config",
            SourceError::Timeout(_) => "timeout",
            SourceError::Transport(_) => "transport",
            SourceError::Protocol { .. } => "upstream_error",
            SourceError::Decode(_) => "decode",
            SourceError::Unexpected(_) => "internal_error",
        }
    }
}
