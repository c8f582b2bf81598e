use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::route::RouteError;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("timestamp interval must be positive")]
    InvalidInterval,
    #[error("visit times starting at {started_at} leave the supported date range")]
    OutOfRange { started_at: DateTime<Utc> },
    #[error(transparent)]
    Route(#[from] RouteError),
}
