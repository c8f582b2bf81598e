use std::sync::Arc;

use tokio::sync::Mutex;

use crate::feed::LiveFeed;
use crate::route::OpenRouteService;
use crate::store::TrackStore;
use crate::track::TrackAssembler;

#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<TrackAssembler<OpenRouteService>>,
    pub store: Arc<dyn TrackStore>,
    pub feed: Arc<Mutex<LiveFeed>>,
}
