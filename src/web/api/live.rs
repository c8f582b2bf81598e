use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::feed::{FeedError, FeedStatus};
use crate::track::VehicleRef;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::api::tracks::TrackRequest;
use crate::web::state::AppState;

#[utoipa::path(
    post,
    path = "/api/tracks/live",
    request_body = TrackRequest,
    responses(
        (status = 202, description = "Live feed started", body = FeedStatus),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Vehicle already has a running feed", body = ErrorResponse),
        (status = 502, description = "Routing provider failed", body = ErrorResponse)
    ),
    tag = "live"
)]
pub async fn start_live(
    State(state): State<AppState>,
    Json(request): Json<TrackRequest>,
) -> ApiResult<(StatusCode, Json<FeedStatus>)> {
    let vehicle = request.vehicle;
    if state.feed.lock().await.is_running(vehicle) {
        return Err(FeedError::AlreadyRunning(vehicle).into());
    }

    let track = state
        .assembler
        .assemble(vehicle, &request.route_request(), Utc::now())
        .await?;

    let status = state.feed.lock().await.start(track)?;
    Ok((StatusCode::ACCEPTED, Json(status)))
}

#[utoipa::path(
    post,
    path = "/api/tracks/live/{vehicle}/stop",
    params(
        ("vehicle" = u32, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 200, description = "Live feed stopped", body = FeedStatus),
        (status = 404, description = "No feed for this vehicle", body = ErrorResponse)
    ),
    tag = "live"
)]
pub async fn stop_live(
    State(state): State<AppState>,
    Path(vehicle): Path<u32>,
) -> ApiResult<Json<FeedStatus>> {
    let status = state.feed.lock().await.stop(VehicleRef(vehicle)).await?;
    Ok(Json(status))
}

#[utoipa::path(
    get,
    path = "/api/tracks/live/{vehicle}",
    params(
        ("vehicle" = u32, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 200, description = "Live feed status", body = FeedStatus),
        (status = 404, description = "No feed for this vehicle", body = ErrorResponse)
    ),
    tag = "live"
)]
pub async fn live_status(
    State(state): State<AppState>,
    Path(vehicle): Path<u32>,
) -> ApiResult<Json<FeedStatus>> {
    let vehicle = VehicleRef(vehicle);
    let status = state
        .feed
        .lock()
        .await
        .status(vehicle)
        .ok_or(FeedError::NotFound(vehicle))?;
    Ok(Json(status))
}

#[utoipa::path(
    get,
    path = "/api/tracks/live",
    responses(
        (status = 200, description = "All live feeds", body = Vec<FeedStatus>)
    ),
    tag = "live"
)]
pub async fn list_live(State(state): State<AppState>) -> Json<Vec<FeedStatus>> {
    Json(state.feed.lock().await.statuses())
}
