use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tempdir::TempDir;

use fleet_tracks::feed::LiveFeed;
use fleet_tracks::geo::GeoPoint;
use fleet_tracks::playback::{InstantPlayback, Playback, PlaybackState, RealTimePlayback};
use fleet_tracks::route::{
    ProviderError, RouteCandidate, RouteError, RouteProvider, RouteRequest, RouteResponse,
};
use fleet_tracks::store::{FileStore, TrackStore};
use fleet_tracks::track::{TrackAssembler, TrackError, VehicleRef};

const CANONICAL: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

/// Serves a fixed geometry, or no route at all, and counts calls.
struct FakeProvider {
    geometry: Option<&'static str>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn with_route(geometry: &'static str) -> Self {
        Self {
            geometry: Some(geometry),
            calls: AtomicUsize::new(0),
        }
    }

    fn without_route() -> Self {
        Self {
            geometry: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl RouteProvider for FakeProvider {
    async fn fetch_route(&self, _request: &RouteRequest) -> Result<RouteResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let routes = self
            .geometry
            .map(|geometry| RouteCandidate {
                geometry: geometry.to_string(),
                summary: None,
            })
            .into_iter()
            .collect();
        Ok(RouteResponse { routes })
    }
}

fn request(max_speed_kmh: u32) -> RouteRequest {
    RouteRequest::new(
        GeoPoint::new(34.05, -118.25),
        GeoPoint::new(34.10, -118.30),
        max_speed_kmh,
    )
}

fn started_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, 1, 8, 0, 0).unwrap()
}

#[tokio::test]
async fn instant_track_lands_in_file_store() {
    let dir = TempDir::new("pipeline-instant").unwrap();
    let store: Arc<dyn TrackStore> = Arc::new(FileStore::new(dir.path().to_path_buf()));
    let assembler = TrackAssembler::new(FakeProvider::with_route(CANONICAL));

    let track = assembler
        .assemble(VehicleRef(1), &request(80), started_at())
        .await
        .unwrap();
    let report = InstantPlayback::new(store.clone())
        .play(track.clone())
        .await
        .unwrap();

    let stored = store.load_track(&report.track_id).unwrap();
    assert_eq!(stored, track);

    let latitudes: Vec<f64> = stored.points.iter().map(|p| p.point.latitude).collect();
    assert_eq!(latitudes, vec![38.5, 40.7, 43.252]);
    assert_eq!(
        stored.finished_at,
        Some(started_at() + chrono::Duration::seconds(20))
    );

    let listed = store.list_tracks(Some(VehicleRef(1))).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, report.track_id);
    assert!(store.list_tracks(Some(VehicleRef(2))).unwrap().is_empty());
}

#[tokio::test]
async fn missing_route_stores_empty_shell() {
    let dir = TempDir::new("pipeline-empty").unwrap();
    let store: Arc<dyn TrackStore> = Arc::new(FileStore::new(dir.path().to_path_buf()));
    let assembler = TrackAssembler::new(FakeProvider::without_route());

    let track = assembler
        .assemble(VehicleRef(2), &request(80), started_at())
        .await
        .unwrap();
    assert!(track.is_empty());
    assert_eq!(track.finished_at, None);

    let report = InstantPlayback::new(store.clone()).play(track).await.unwrap();
    let stored = store.load_track(&report.track_id).unwrap();
    assert!(stored.points.is_empty());
    assert_eq!(stored.finished_at, None);
}

#[tokio::test]
async fn invalid_request_never_reaches_provider() {
    let assembler = TrackAssembler::new(FakeProvider::with_route(CANONICAL));

    let result = assembler
        .assemble(VehicleRef(3), &request(0), started_at())
        .await;

    assert!(matches!(
        result,
        Err(TrackError::Route(RouteError::InvalidRequest(_)))
    ));
    assert_eq!(assembler.provider().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn broken_geometry_discards_the_trip() {
    let assembler = TrackAssembler::new(FakeProvider::with_route("_p~iF~ps|U_ulLnnqC_mq"));

    let result = assembler
        .assemble(VehicleRef(4), &request(60), started_at())
        .await;
    assert!(matches!(
        result,
        Err(TrackError::Route(RouteError::Decode(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn realtime_playback_can_be_cancelled_midway() {
    let dir = TempDir::new("pipeline-live").unwrap();
    let store: Arc<dyn TrackStore> = Arc::new(FileStore::new(dir.path().to_path_buf()));
    let assembler = TrackAssembler::new(FakeProvider::with_route(CANONICAL));
    let track = assembler
        .assemble(VehicleRef(5), &request(100), started_at())
        .await
        .unwrap();

    let playback = Arc::new(RealTimePlayback::new(store.clone(), Duration::from_secs(10)));
    let worker = {
        let playback = playback.clone();
        tokio::spawn(async move { playback.play(track).await })
    };

    tokio::time::sleep(Duration::from_secs(15)).await;
    playback.cancel();
    let report = worker.await.unwrap().unwrap();

    assert_eq!(report.state, PlaybackState::Cancelled);
    assert_eq!(report.emitted, 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    let stored = store.load_track(&report.track_id).unwrap();
    assert_eq!(stored.points.len(), 1);
    assert_eq!(stored.points[0].visited_at, started_at());
}

#[tokio::test(start_paused = true)]
async fn live_feed_runs_to_completion() {
    let dir = TempDir::new("pipeline-feed").unwrap();
    let store: Arc<dyn TrackStore> = Arc::new(FileStore::new(dir.path().to_path_buf()));
    let assembler = TrackAssembler::new(FakeProvider::with_route(CANONICAL));
    let track = assembler
        .assemble(VehicleRef(6), &request(100), started_at())
        .await
        .unwrap();

    let mut feed = LiveFeed::new(store.clone(), Duration::from_secs(2));
    feed.start(track).unwrap();
    assert!(feed.is_running(VehicleRef(6)));

    tokio::time::sleep(Duration::from_secs(7)).await;
    let status = feed.status(VehicleRef(6)).unwrap();
    assert_eq!(status.playback.state, PlaybackState::Completed);
    assert_eq!(status.playback.emitted, 3);

    let id = status.playback.track_id.unwrap();
    assert_eq!(store.load_track(&id).unwrap().points.len(), 3);
}
