use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::feed::LiveFeed;
use crate::route::{OpenRouteService, ProviderError};
use crate::store;
use crate::track::{TrackAssembler, TrackError};

use super::api::live as live_handlers;
use super::api::tracks as track_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("routing provider: {0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Track(#[from] TrackError),
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/tracks", get(track_handlers::list_tracks))
        .route("/api/tracks/{id}", get(track_handlers::get_track))
        .route("/api/tracks/instant", post(track_handlers::create_instant))
        .route(
            "/api/tracks/live",
            post(live_handlers::start_live).get(live_handlers::list_live),
        )
        .route("/api/tracks/live/{vehicle}", get(live_handlers::live_status))
        .route(
            "/api/tracks/live/{vehicle}/stop",
            post(live_handlers::stop_live),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();
    let provider = OpenRouteService::from_config(&config.provider)?;
    let assembler = TrackAssembler::with_interval(provider, config.playback.interval_seconds)?;
    let store = store::open(&config.storage);
    let feed = LiveFeed::new(store.clone(), config.playback.delay);

    let state = AppState {
        assembler: Arc::new(assembler),
        store,
        feed: Arc::new(Mutex::new(feed)),
    };
    let feed = state.feed.clone();
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped, cancelling live feeds");
    feed.lock().await.stop_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
