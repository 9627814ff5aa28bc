//! Provider client error types.

use crate::domain::{Capability, ErrorKind};

/// Errors from a provider's HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Parameters unusable for this provider; no request was sent.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Network failure or timeout.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with a non-2xx status.
    #[error("upstream error {status}: {message}")]
    UpstreamError { status: u16, message: String },

    /// Upstream answered 2xx but the body is not the expected JSON.
    #[error("malformed upstream payload: {message}")]
    MalformedPayload {
        message: String,
        body: Option<String>,
    },

    /// The provider was asked for something it cannot answer.
    #[error("capability {0} not supported by this provider")]
    Unsupported(Capability),

    /// The HTTP client could not be built.
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl ProviderError {
    /// The error class reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::InvalidParams(_) | ProviderError::Unsupported(_) => {
                ErrorKind::InvalidParams
            }
            ProviderError::UpstreamUnavailable(_) | ProviderError::Setup(_) => {
                ErrorKind::UpstreamUnavailable
            }
            ProviderError::UpstreamError { .. } | ProviderError::MalformedPayload { .. } => {
                ErrorKind::UpstreamError
            }
        }
    }
    /// Start of the offending body, when the payload could not be decoded.
    pub fn body_excerpt(&self) -> Option<&str> {
        match self {
            ProviderError::MalformedPayload { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ProviderError::UpstreamError {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return ProviderError::MalformedPayload {
                message: err.to_string(),
                body: None,
            };
        }
        if err.is_timeout() {
            return ProviderError::UpstreamUnavailable(format!("request timed out: {err}"));
        }
        ProviderError::UpstreamUnavailable(err.to_string())
    }
}
