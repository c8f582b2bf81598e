use chrono::{DateTime, Utc};

use super::error::TrackError;
use super::timestamp::{stamp, DEFAULT_INTERVAL_SECONDS};
use super::types::{Track, VehicleRef};
use crate::route::{RouteProvider, RouteRequest, RouteResolver};

/// Builds complete tracks: resolve the route, then stamp every point.
pub struct TrackAssembler<P> {
    resolver: RouteResolver<P>,
    interval_seconds: u32,
}

impl<P: RouteProvider> TrackAssembler<P> {
    pub fn new(provider: P) -> Self {
        Self {
            resolver: RouteResolver::new(provider),
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
        }
    }

    pub fn with_interval(provider: P, interval_seconds: u32) -> Result<Self, TrackError> {
        if interval_seconds == 0 {
            return Err(TrackError::InvalidInterval);
        }
        Ok(Self {
            resolver: RouteResolver::new(provider),
            interval_seconds,
        })
    }

    pub fn interval_seconds(&self) -> u32 {
        self.interval_seconds
    }

    pub fn provider(&self) -> &P {
        self.resolver.provider()
    }

    /// An empty route yields a track with no points and no `finished_at`.
    pub async fn assemble(
        &self,
        vehicle: VehicleRef,
        request: &RouteRequest,
        started_at: DateTime<Utc>,
    ) -> Result<Track, TrackError> {
        let path = self.resolver.resolve(request).await?;
        let points = stamp(&path, started_at, self.interval_seconds)?;
        let track = Track::new(vehicle, started_at, points);

        if track.is_empty() {
            log::warn!("Vehicle {}: route resolved to an empty track", vehicle);
        } else {
            log::info!(
                "Vehicle {}: assembled track with {} points ({} -> {:?})",
                vehicle,
                track.len(),
                track.started_at,
                track.finished_at
            );
        }
        Ok(track)
    }
}
