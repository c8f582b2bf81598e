use serde::Serialize;
use utoipa::ToSchema;

use crate::store::TrackId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    /// Waiting to emit point `next`.
    Emitting { next: usize },
    Completed,
    Cancelled,
    Failed { reason: String },
}

impl PlaybackState {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PlaybackState::Completed | PlaybackState::Cancelled | PlaybackState::Failed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlaybackStatus {
    pub track_id: Option<TrackId>,
    pub state: PlaybackState,
    pub emitted: usize,
    pub total: usize,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            track_id: None,
            state: PlaybackState::Idle,
            emitted: 0,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlaybackReport {
    pub track_id: TrackId,
    pub state: PlaybackState,
    pub emitted: usize,
    pub total: usize,
}
