mod assembler;
mod error;
mod timestamp;
mod types;

pub use assembler::TrackAssembler;
pub use error::TrackError;
pub use timestamp::{stamp, DEFAULT_INTERVAL_SECONDS};
pub use types::{TimestampedPoint, Track, VehicleRef};
