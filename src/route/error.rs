use thiserror::Error;

use crate::polyline::DecodeError;

/// Failure talking to the routing provider. Retryable by the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured (set provider.api_key or {})", crate::config::API_KEY_ENV)]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid provider response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route request: {0}")]
    InvalidRequest(String),
    #[error("route provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("malformed route geometry: {0}")]
    Decode(#[from] DecodeError),
}
