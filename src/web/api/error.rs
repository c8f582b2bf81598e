use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::feed::FeedError;
use crate::playback::PlaybackError;
use crate::route::RouteError;
use crate::store::StoreError;
use crate::track::TrackError;

pub enum ApiError {
    Validation(String),
    NotFound(&'static str),
    Conflict(&'static str),
    /// The routing provider failed or answered with something unusable.
    Provider(String),
    Storage(String),
}

impl From<TrackError> for ApiError {
    fn from(e: TrackError) -> Self {
        match e {
            TrackError::InvalidInterval | TrackError::OutOfRange { .. } => {
                ApiError::Validation(e.to_string())
            }
            TrackError::Route(RouteError::InvalidRequest(msg)) => ApiError::Validation(msg),
            TrackError::Route(e) => ApiError::Provider(e.to_string()),
        }
    }
}

impl From<PlaybackError> for ApiError {
    fn from(e: PlaybackError) -> Self {
        match e {
            PlaybackError::AlreadyStarted => ApiError::Conflict("playback_already_started"),
            _ => ApiError::Storage(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound("track_not_found"),
            _ => ApiError::Storage(e.to_string()),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::AlreadyRunning(_) => ApiError::Conflict("feed_already_running"),
            FeedError::NotFound(_) => ApiError::NotFound("feed_not_found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::NotFound(reason) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Conflict(reason) => {
                (StatusCode::CONFLICT, Json(ErrorResponse::new(reason))).into_response()
            }
            ApiError::Provider(msg) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("routing_failed", &msg)),
            )
                .into_response(),
            ApiError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("storage_error", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
