use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::GeoPoint;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct VehicleRef(pub u32);

impl fmt::Display for VehicleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimestampedPoint {
    pub point: GeoPoint,
    pub visited_at: DateTime<Utc>,
}

/// One simulated trip. `finished_at` is unset when the route was empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Track {
    pub vehicle: VehicleRef,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub points: Vec<TimestampedPoint>,
}

impl Track {
    pub fn new(
        vehicle: VehicleRef,
        started_at: DateTime<Utc>,
        points: Vec<TimestampedPoint>,
    ) -> Self {
        let finished_at = points.last().map(|p| p.visited_at);
        Self {
            vehicle,
            started_at,
            finished_at,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}
