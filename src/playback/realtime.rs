use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::error::PlaybackError;
use super::types::{PlaybackReport, PlaybackState, PlaybackStatus};
use super::Playback;
use crate::store::{TrackId, TrackStore};
use crate::track::Track;

/// Emits a track point by point, waiting `delay` before each point, the
/// way a live GPS feed would deliver it.
///
/// The recorded visit times come from the track itself; `delay` only
/// decides when each point is written. One instance plays one track.
pub struct RealTimePlayback {
    store: Arc<dyn TrackStore>,
    delay: Duration,
    cancel: CancellationToken,
    status: StdMutex<PlaybackStatus>,
}

impl RealTimePlayback {
    pub fn new(store: Arc<dyn TrackStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            cancel: CancellationToken::new(),
            status: StdMutex::new(PlaybackStatus::default()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status.lock().unwrap().clone()
    }

    /// Stops emitting at the next wait boundary. Points already written stay.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn update(&self, f: impl FnOnce(&mut PlaybackStatus)) {
        f(&mut *self.status.lock().unwrap());
    }

    fn finish(&self, track_id: TrackId, state: PlaybackState) -> PlaybackReport {
        let mut status = self.status.lock().unwrap();
        status.state = state.clone();
        PlaybackReport {
            track_id,
            state,
            emitted: status.emitted,
            total: status.total,
        }
    }
}

impl Playback for RealTimePlayback {
    async fn play(&self, track: Track) -> Result<PlaybackReport, PlaybackError> {
        {
            let mut status = self.status.lock().unwrap();
            if status.state != PlaybackState::Idle {
                return Err(PlaybackError::AlreadyStarted);
            }
            status.state = PlaybackState::Emitting { next: 0 };
            status.total = track.len();
        }

        let track_id = match self.store.save_track_shell(&track) {
            Ok(id) => id,
            Err(e) => {
                self.update(|s| {
                    s.state = PlaybackState::Failed {
                        reason: e.to_string(),
                    }
                });
                return Err(PlaybackError::Shell(e));
            }
        };
        self.update(|s| s.track_id = Some(track_id.clone()));

        log::info!(
            "Track {} for vehicle {}: playing {} points every {:?}",
            track_id,
            track.vehicle,
            track.len(),
            self.delay
        );

        for (i, point) in track.points.iter().enumerate() {
            self.update(|s| s.state = PlaybackState::Emitting { next: i });

            let cancelled = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => true,
                _ = sleep(self.delay) => false,
            };
            if cancelled {
                log::warn!(
                    "Track {}: playback cancelled after {} of {} points",
                    track_id,
                    i,
                    track.len()
                );
                return Ok(self.finish(track_id, PlaybackState::Cancelled));
            }

            if let Err(source) = self.store.save_point(&track_id, point) {
                log::error!("Track {}: failed to store point {}: {}", track_id, i, source);
                self.finish(
                    track_id.clone(),
                    PlaybackState::Failed {
                        reason: source.to_string(),
                    },
                );
                return Err(PlaybackError::Store {
                    track_id,
                    emitted: i,
                    source,
                });
            }

            self.update(|s| s.emitted = i + 1);
            log::debug!("Track {}: emitted point {} at {}", track_id, i, point.visited_at);
        }

        log::info!("Track {}: playback completed", track_id);
        Ok(self.finish(track_id, PlaybackState::Completed))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use tokio::time::Instant;

    use super::*;
    use crate::geo::GeoPoint;
    use crate::store::{MemoryStore, StoreError, TrackEntry};
    use crate::track::{stamp, TimestampedPoint, VehicleRef};

    const DELAY: Duration = Duration::from_secs(10);

    fn track(len: usize) -> Track {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        let path: Vec<GeoPoint> = (0..len)
            .map(|i| GeoPoint::new(34.0 + i as f64 * 1e-3, -118.3))
            .collect();
        Track::new(VehicleRef(9), start, stamp(&path, start, 10).unwrap())
    }

    /// Records when each point arrives and can fail from a given point on.
    struct RecordingStore {
        inner: MemoryStore,
        emissions: StdMutex<Vec<(usize, Instant)>>,
        fail_from: Option<usize>,
        seen: AtomicUsize,
    }

    impl RecordingStore {
        fn new(fail_from: Option<usize>) -> Self {
            Self {
                inner: MemoryStore::new(),
                emissions: StdMutex::new(Vec::new()),
                fail_from,
                seen: AtomicUsize::new(0),
            }
        }

        fn emissions(&self) -> Vec<(usize, Instant)> {
            self.emissions.lock().unwrap().clone()
        }
    }

    impl TrackStore for RecordingStore {
        fn save_track_batch(&self, track: &Track) -> Result<TrackId, StoreError> {
            self.inner.save_track_batch(track)
        }

        fn save_track_shell(&self, track: &Track) -> Result<TrackId, StoreError> {
            self.inner.save_track_shell(track)
        }

        fn save_point(&self, id: &TrackId, point: &TimestampedPoint) -> Result<(), StoreError> {
            let index = self.seen.fetch_add(1, Ordering::SeqCst);
            if self.fail_from.is_some_and(|from| index >= from) {
                return Err(StoreError::Io(std::io::Error::other("write failed")));
            }
            self.inner.save_point(id, point)?;
            self.emissions.lock().unwrap().push((index, Instant::now()));
            Ok(())
        }

        fn load_track(&self, id: &TrackId) -> Result<Track, StoreError> {
            self.inner.load_track(id)
        }

        fn list_tracks(&self, vehicle: Option<VehicleRef>) -> Result<Vec<TrackEntry>, StoreError> {
            self.inner.list_tracks(vehicle)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_in_order_with_delay() {
        let store = Arc::new(RecordingStore::new(None));
        let playback = RealTimePlayback::new(store.clone(), DELAY);
        let original = track(5);

        let started = Instant::now();
        let report = playback.play(original.clone()).await.unwrap();

        assert_eq!(report.state, PlaybackState::Completed);
        assert_eq!(report.emitted, 5);

        let emissions = store.emissions();
        let order: Vec<usize> = emissions.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(emissions[0].1 - started >= DELAY);
        for pair in emissions.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= DELAY);
        }

        let stored = store.load_track(&report.track_id).unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test(start_paused = true)]
    async fn visit_times_ignore_pacing() {
        let store = Arc::new(MemoryStore::new());
        let playback = RealTimePlayback::new(store.clone(), Duration::from_secs(1));
        let original = track(3);

        let report = playback.play(original.clone()).await.unwrap();
        let stored = store.load_track(&report.track_id).unwrap();

        assert_eq!(stored.started_at, original.started_at);
        assert_eq!(stored.finished_at, original.finished_at);
        assert_eq!(
            (stored.points[1].visited_at - stored.points[0].visited_at).num_seconds(),
            10
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_emissions() {
        let store = Arc::new(RecordingStore::new(None));
        let playback = Arc::new(RealTimePlayback::new(store.clone(), DELAY));

        let worker = {
            let playback = playback.clone();
            tokio::spawn(async move { playback.play(track(6)).await })
        };

        sleep(Duration::from_secs(25)).await;
        playback.cancel();
        let report = worker.await.unwrap().unwrap();

        assert_eq!(report.state, PlaybackState::Cancelled);
        assert_eq!(report.emitted, 2);
        assert_eq!(report.total, 6);

        sleep(DELAY * 3).await;
        assert_eq!(store.emissions().len(), 2);
        assert_eq!(store.load_track(&report.track_id).unwrap().points.len(), 2);
        assert_eq!(playback.status().state, PlaybackState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_point_keeps_shell() {
        let store = Arc::new(MemoryStore::new());
        let playback = RealTimePlayback::new(store.clone(), DELAY);
        playback.cancel();

        let report = playback.play(track(3)).await.unwrap();
        assert_eq!(report.state, PlaybackState::Cancelled);
        assert_eq!(report.emitted, 0);
        assert!(store.load_track(&report.track_id).unwrap().points.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn store_failure_ends_in_failed_state() {
        let store = Arc::new(RecordingStore::new(Some(2)));
        let playback = RealTimePlayback::new(store.clone(), DELAY);

        let result = playback.play(track(5)).await;
        assert!(matches!(
            result,
            Err(PlaybackError::Store { emitted: 2, .. })
        ));

        let status = playback.status();
        assert!(matches!(status.state, PlaybackState::Failed { .. }));
        assert_eq!(status.emitted, 2);
        assert_eq!(store.emissions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_track_completes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let playback = RealTimePlayback::new(store.clone(), DELAY);

        let report = playback.play(track(0)).await.unwrap();
        assert_eq!(report.state, PlaybackState::Completed);
        assert_eq!(report.total, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn plays_only_once() {
        let store = Arc::new(MemoryStore::new());
        let playback = RealTimePlayback::new(store, Duration::ZERO);

        playback.play(track(1)).await.unwrap();
        let again = playback.play(track(1)).await;
        assert!(matches!(again, Err(PlaybackError::AlreadyStarted)));
    }
}
