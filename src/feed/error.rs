use thiserror::Error;

use crate::track::VehicleRef;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("live feed already running for vehicle {0}")]
    AlreadyRunning(VehicleRef),
    #[error("no live feed for vehicle {0}")]
    NotFound(VehicleRef),
}
