use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::error::FeedError;
use crate::playback::{Playback, PlaybackError, PlaybackReport, PlaybackStatus, RealTimePlayback};
use crate::store::TrackStore;
use crate::track::{Track, VehicleRef};

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FeedStatus {
    pub vehicle: VehicleRef,
    pub playback: PlaybackStatus,
}

struct Session {
    playback: Arc<RealTimePlayback>,
    join: Option<JoinHandle<Result<PlaybackReport, PlaybackError>>>,
}

/// Simulated live GPS feeds, at most one running per vehicle.
///
/// Finished sessions stay queryable until the vehicle starts a new one.
pub struct LiveFeed {
    store: Arc<dyn TrackStore>,
    delay: Duration,
    sessions: HashMap<VehicleRef, Session>,
}

impl LiveFeed {
    pub fn new(store: Arc<dyn TrackStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            sessions: HashMap::new(),
        }
    }

    pub fn is_running(&self, vehicle: VehicleRef) -> bool {
        self.sessions
            .get(&vehicle)
            .is_some_and(|s| !s.playback.status().state.is_finished())
    }

    pub fn start(&mut self, track: Track) -> Result<FeedStatus, FeedError> {
        let vehicle = track.vehicle;
        if self.is_running(vehicle) {
            return Err(FeedError::AlreadyRunning(vehicle));
        }

        let playback = Arc::new(RealTimePlayback::new(self.store.clone(), self.delay));
        let worker = playback.clone();
        let join = tokio::spawn(async move {
            let result = worker.play(track).await;
            if let Err(e) = &result {
                log::error!("Vehicle {}: live feed failed: {}", vehicle, e);
            }
            result
        });

        log::info!("Vehicle {}: live feed started", vehicle);
        let status = FeedStatus {
            vehicle,
            playback: playback.status(),
        };
        self.sessions.insert(
            vehicle,
            Session {
                playback,
                join: Some(join),
            },
        );
        Ok(status)
    }

    /// Cancels the vehicle's feed and waits for its worker to finish.
    pub async fn stop(&mut self, vehicle: VehicleRef) -> Result<FeedStatus, FeedError> {
        let session = self
            .sessions
            .get_mut(&vehicle)
            .ok_or(FeedError::NotFound(vehicle))?;

        session.playback.cancel();
        if let Some(join) = session.join.take() {
            if let Err(e) = join.await {
                log::error!("Vehicle {}: live feed worker panicked: {}", vehicle, e);
            }
        }

        Ok(FeedStatus {
            vehicle,
            playback: session.playback.status(),
        })
    }

    pub async fn stop_all(&mut self) {
        let vehicles: Vec<VehicleRef> = self.sessions.keys().copied().collect();
        for vehicle in vehicles {
            let _ = self.stop(vehicle).await;
        }
    }

    pub fn status(&self, vehicle: VehicleRef) -> Option<FeedStatus> {
        self.sessions.get(&vehicle).map(|session| FeedStatus {
            vehicle,
            playback: session.playback.status(),
        })
    }

    pub fn statuses(&self) -> Vec<FeedStatus> {
        let mut statuses: Vec<FeedStatus> = self
            .sessions
            .iter()
            .map(|(vehicle, session)| FeedStatus {
                vehicle: *vehicle,
                playback: session.playback.status(),
            })
            .collect();
        statuses.sort_by_key(|s| s.vehicle);
        statuses
    }
}
