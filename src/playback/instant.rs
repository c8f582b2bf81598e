use std::sync::Arc;

use super::error::PlaybackError;
use super::types::{PlaybackReport, PlaybackState};
use super::Playback;
use crate::store::TrackStore;
use crate::track::Track;

/// Persists the whole track in a single batch, with no pacing.
pub struct InstantPlayback {
    store: Arc<dyn TrackStore>,
}

impl InstantPlayback {
    pub fn new(store: Arc<dyn TrackStore>) -> Self {
        Self { store }
    }
}

impl Playback for InstantPlayback {
    async fn play(&self, track: Track) -> Result<PlaybackReport, PlaybackError> {
        let track_id = self
            .store
            .save_track_batch(&track)
            .map_err(PlaybackError::Shell)?;

        log::info!(
            "Track {} for vehicle {} stored with {} points",
            track_id,
            track.vehicle,
            track.len()
        );

        Ok(PlaybackReport {
            track_id,
            state: PlaybackState::Completed,
            emitted: track.len(),
            total: track.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::geo::GeoPoint;
    use crate::store::{MemoryStore, StoreError, TrackEntry, TrackId};
    use crate::track::{TimestampedPoint, VehicleRef};

    fn track(len: i64) -> Track {
        let start = Utc.with_ymd_and_hms(2023, 1, 5, 9, 0, 0).unwrap();
        let points = (0..len)
            .map(|i| TimestampedPoint {
                point: GeoPoint::new(36.2, -115.1),
                visited_at: start + Duration::seconds(10 * i),
            })
            .collect();
        Track::new(VehicleRef(5), start, points)
    }

    #[tokio::test]
    async fn stores_track_in_one_batch() {
        let store = Arc::new(MemoryStore::new());
        let playback = InstantPlayback::new(store.clone());

        let original = track(6);
        let report = playback.play(original.clone()).await.unwrap();

        assert_eq!(report.state, PlaybackState::Completed);
        assert_eq!(report.emitted, 6);
        assert_eq!(store.load_track(&report.track_id).unwrap(), original);
    }

    #[tokio::test]
    async fn empty_track_is_still_recorded() {
        let store = Arc::new(MemoryStore::new());
        let playback = InstantPlayback::new(store.clone());

        let report = playback.play(track(0)).await.unwrap();
        assert_eq!(report.total, 0);
        assert_eq!(store.len(), 1);
    }

    struct BrokenStore;

    impl TrackStore for BrokenStore {
        fn save_track_batch(&self, _: &Track) -> Result<TrackId, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        fn save_track_shell(&self, _: &Track) -> Result<TrackId, StoreError> {
            unreachable!()
        }
        fn save_point(&self, _: &TrackId, _: &TimestampedPoint) -> Result<(), StoreError> {
            unreachable!()
        }
        fn load_track(&self, id: &TrackId) -> Result<Track, StoreError> {
            Err(StoreError::NotFound(id.clone()))
        }
        fn list_tracks(&self, _: Option<VehicleRef>) -> Result<Vec<TrackEntry>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let playback = InstantPlayback::new(Arc::new(BrokenStore));
        let result = playback.play(track(2)).await;
        assert!(matches!(result, Err(PlaybackError::Shell(StoreError::Io(_)))));
    }
}
