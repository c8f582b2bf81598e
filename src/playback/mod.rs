mod error;
mod instant;
mod realtime;
mod types;

pub use error::PlaybackError;
pub use instant::InstantPlayback;
pub use realtime::RealTimePlayback;
pub use types::{PlaybackReport, PlaybackState, PlaybackStatus};

use std::future::Future;

use crate::track::Track;

/// How an assembled track reaches the store.
pub trait Playback: Send + Sync {
    fn play(&self, track: Track)
        -> impl Future<Output = Result<PlaybackReport, PlaybackError>> + Send;
}
