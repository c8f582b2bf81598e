use thiserror::Error;

use crate::playback::PlaybackError;
use crate::track::TrackError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}
