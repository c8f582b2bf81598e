use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::RouteError;
use crate::geo::GeoPoint;

/// A driving route query between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteRequest {
    pub start: GeoPoint,
    pub finish: GeoPoint,
    pub max_speed_kmh: u32,
    #[serde(default)]
    pub include_elevation: bool,
}

impl RouteRequest {
    pub fn new(start: GeoPoint, finish: GeoPoint, max_speed_kmh: u32) -> Self {
        Self {
            start,
            finish,
            max_speed_kmh,
            include_elevation: false,
        }
    }

    pub fn with_elevation(mut self, include_elevation: bool) -> Self {
        self.include_elevation = include_elevation;
        self
    }

    pub fn validate(&self) -> Result<(), RouteError> {
        if self.max_speed_kmh == 0 {
            return Err(RouteError::InvalidRequest(
                "max_speed_kmh must be positive".into(),
            ));
        }
        if !self.start.is_valid() {
            return Err(RouteError::InvalidRequest(format!(
                "start is out of range: {:?}",
                self.start.lon_lat()
            )));
        }
        if !self.finish.is_valid() {
            return Err(RouteError::InvalidRequest(format!(
                "finish is out of range: {:?}",
                self.finish.lon_lat()
            )));
        }
        Ok(())
    }
}

/// Provider reply: zero or more candidate routes, best first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteCandidate {
    pub geometry: String,
    #[serde(default)]
    pub summary: Option<RouteSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct RouteSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}
