mod error;
mod file;
mod memory;
mod types;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use types::{TrackEntry, TrackId};

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::track::{TimestampedPoint, Track, VehicleRef};

/// Persistence for assembled tracks.
///
/// Implementations must tolerate concurrent writes for different tracks.
pub trait TrackStore: Send + Sync {
    /// Stores a whole track, header and points, in one call.
    fn save_track_batch(&self, track: &Track) -> Result<TrackId, StoreError>;

    /// Stores only the track header so points can be added one by one.
    fn save_track_shell(&self, track: &Track) -> Result<TrackId, StoreError>;

    fn save_point(&self, id: &TrackId, point: &TimestampedPoint) -> Result<(), StoreError>;

    fn load_track(&self, id: &TrackId) -> Result<Track, StoreError>;

    /// Lists stored tracks, oldest start first.
    fn list_tracks(&self, vehicle: Option<VehicleRef>) -> Result<Vec<TrackEntry>, StoreError>;
}

/// Opens the store described by `config`.
pub fn open(config: &StorageConfig) -> Arc<dyn TrackStore> {
    match &config.base_folder {
        Some(base) => {
            log::info!("Storing tracks under {}", base.display());
            Arc::new(FileStore::new(base.clone()))
        }
        None => {
            log::warn!("No storage folder configured, tracks are kept in memory");
            Arc::new(MemoryStore::new())
        }
    }
}
