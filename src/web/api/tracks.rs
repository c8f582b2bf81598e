use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::geo::GeoPoint;
use crate::playback::{InstantPlayback, Playback};
use crate::route::RouteRequest;
use crate::store::{TrackEntry, TrackId};
use crate::track::{Track, VehicleRef};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// A trip to synthesize. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrackRequest {
    pub vehicle: VehicleRef,
    #[schema(value_type = Vec<f64>)]
    pub start: [f64; 2],
    #[schema(value_type = Vec<f64>)]
    pub finish: [f64; 2],
    pub max_speed_kmh: u32,
    #[serde(default)]
    pub include_elevation: bool,
    /// Defaults to the time of the request.
    pub started_at: Option<DateTime<Utc>>,
}

impl TrackRequest {
    pub fn route_request(&self) -> RouteRequest {
        let [start_lon, start_lat] = self.start;
        let [finish_lon, finish_lat] = self.finish;
        RouteRequest::new(
            GeoPoint::new(start_lat, start_lon),
            GeoPoint::new(finish_lat, finish_lon),
            self.max_speed_kmh,
        )
        .with_elevation(self.include_elevation)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackSummary {
    pub track_id: TrackId,
    pub vehicle: VehicleRef,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub points: usize,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListTracksQuery {
    /// Only list tracks of this vehicle.
    pub vehicle: Option<u32>,
}

#[utoipa::path(
    post,
    path = "/api/tracks/instant",
    request_body = TrackRequest,
    responses(
        (status = 201, description = "Track assembled and stored", body = TrackSummary),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 502, description = "Routing provider failed", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "tracks"
)]
pub async fn create_instant(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> ApiResult<(StatusCode, Json<TrackSummary>)> {
    let started_at = request.started_at.unwrap_or_else(Utc::now);
    let track = state
        .assembler
        .assemble(request.vehicle, &request.route_request(), started_at)
        .await?;

    let (vehicle, started_at, finished_at, points) =
        (track.vehicle, track.started_at, track.finished_at, track.len());
    let report = InstantPlayback::new(state.store.clone()).play(track).await?;

    Ok((
        StatusCode::CREATED,
        Json(TrackSummary {
            track_id: report.track_id,
            vehicle,
            started_at,
            finished_at,
            points,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/tracks",
    params(ListTracksQuery),
    responses(
        (status = 200, description = "Stored tracks, oldest first", body = Vec<TrackEntry>),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "tracks"
)]
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(query): Query<ListTracksQuery>,
) -> ApiResult<Json<Vec<TrackEntry>>> {
    let entries = state.store.list_tracks(query.vehicle.map(VehicleRef))?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/tracks/{id}",
    params(
        ("id" = String, Path, description = "Track ID")
    ),
    responses(
        (status = 200, description = "Track with all stored points", body = Track),
        (status = 404, description = "Track not found", body = ErrorResponse)
    ),
    tag = "tracks"
)]
pub async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Track>> {
    let id = TrackId::parse(&id).ok_or(ApiError::NotFound("track_not_found"))?;
    let track = state.store.load_track(&id)?;
    Ok(Json(track))
}
