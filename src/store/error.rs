use thiserror::Error;

use super::types::TrackId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Track not found: {0}")]
    NotFound(TrackId),
}
