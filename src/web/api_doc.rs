use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::tracks::{ListTracksQuery, TrackRequest, TrackSummary};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::tracks::create_instant,
        super::api::tracks::list_tracks,
        super::api::tracks::get_track,
        super::api::live::start_live,
        super::api::live::stop_live,
        super::api::live::live_status,
        super::api::live::list_live,
    ),
    components(
        schemas(
            TrackRequest,
            TrackSummary,
            ListTracksQuery,
            ErrorResponse,
            crate::feed::FeedStatus,
            crate::playback::PlaybackStatus,
            crate::playback::PlaybackState,
            crate::store::TrackEntry,
            crate::store::TrackId,
            crate::track::Track,
            crate::track::TimestampedPoint,
            crate::track::VehicleRef,
            crate::geo::GeoPoint,
        )
    ),
    info(
        title = "Fleet Tracks API",
        description = "Synthesizes vehicle GPS tracks from routed trips",
        version = "0.1.0"
    ),
    tags(
        (name = "tracks", description = "Instant track synthesis and stored tracks"),
        (name = "live", description = "Simulated real-time feeds")
    )
)]
pub struct ApiDoc;
