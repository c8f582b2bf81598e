use thiserror::Error;

use crate::store::{StoreError, TrackId};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("playback already started")]
    AlreadyStarted,
    #[error("failed to store track: {0}")]
    Shell(#[source] StoreError),
    #[error("failed to store point {emitted} of track {track_id}: {source}")]
    Store {
        track_id: TrackId,
        emitted: usize,
        #[source]
        source: StoreError,
    },
}
