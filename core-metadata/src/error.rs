use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("{provider} request timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

impl MetadataError {
    /// Transport-level failures (timeouts, resets) as opposed to a provider
    /// answering with something we could not use.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MetadataError::NetworkError(_) | MetadataError::Timeout { .. } | MetadataError::Bridge(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
