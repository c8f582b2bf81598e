use std::collections::HashMap;
use std::sync::Mutex;

use super::error::StoreError;
use super::types::{TrackEntry, TrackId};
use super::TrackStore;
use crate::track::{TimestampedPoint, Track, VehicleRef};

#[derive(Debug)]
struct StoredTrack {
    entry: TrackEntry,
    points: Vec<TimestampedPoint>,
}

/// Keeps tracks in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tracks: Mutex<HashMap<TrackId, StoredTrack>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, track: &Track, points: Vec<TimestampedPoint>) -> TrackId {
        let id = TrackId::generate(track.started_at);
        let stored = StoredTrack {
            entry: TrackEntry::new(id.clone(), track),
            points,
        };
        self.tracks.lock().unwrap().insert(id.clone(), stored);
        id
    }
}

impl TrackStore for MemoryStore {
    fn save_track_batch(&self, track: &Track) -> Result<TrackId, StoreError> {
        Ok(self.insert(track, track.points.clone()))
    }

    fn save_track_shell(&self, track: &Track) -> Result<TrackId, StoreError> {
        Ok(self.insert(track, Vec::new()))
    }

    fn save_point(&self, id: &TrackId, point: &TimestampedPoint) -> Result<(), StoreError> {
        let mut tracks = self.tracks.lock().unwrap();
        let stored = tracks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        stored.points.push(point.clone());
        Ok(())
    }

    fn load_track(&self, id: &TrackId) -> Result<Track, StoreError> {
        let tracks = self.tracks.lock().unwrap();
        let stored = tracks
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(Track {
            vehicle: stored.entry.vehicle,
            started_at: stored.entry.started_at,
            finished_at: stored.entry.finished_at,
            points: stored.points.clone(),
        })
    }

    fn list_tracks(&self, vehicle: Option<VehicleRef>) -> Result<Vec<TrackEntry>, StoreError> {
        let tracks = self.tracks.lock().unwrap();
        let mut entries: Vec<TrackEntry> = tracks
            .values()
            .map(|stored| stored.entry.clone())
            .filter(|entry| vehicle.map_or(true, |v| entry.vehicle == v))
            .collect();
        entries.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::geo::GeoPoint;

    fn track(vehicle: u32, hour: u32, len: i64) -> Track {
        let start = Utc.with_ymd_and_hms(2022, 5, 1, hour, 0, 0).unwrap();
        let points = (0..len)
            .map(|i| TimestampedPoint {
                point: GeoPoint::new(36.1, -115.2),
                visited_at: start + Duration::seconds(10 * i),
            })
            .collect();
        Track::new(VehicleRef(vehicle), start, points)
    }

    #[test]
    fn batch_round_trips() {
        let store = MemoryStore::new();
        let original = track(1, 8, 4);
        let id = store.save_track_batch(&original).unwrap();
        assert_eq!(store.load_track(&id).unwrap(), original);
    }

    #[test]
    fn shell_collects_points_in_order() {
        let store = MemoryStore::new();
        let original = track(1, 8, 3);
        let id = store.save_track_shell(&original).unwrap();
        assert!(store.load_track(&id).unwrap().points.is_empty());

        for point in &original.points {
            store.save_point(&id, point).unwrap();
        }
        assert_eq!(store.load_track(&id).unwrap().points, original.points);
    }

    #[test]
    fn unknown_track_is_not_found() {
        let store = MemoryStore::new();
        let id = TrackId("missing".into());
        let point = track(1, 8, 1).points.remove(0);
        assert!(matches!(
            store.save_point(&id, &point),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn lists_by_vehicle_oldest_first() {
        let store = MemoryStore::new();
        store.save_track_batch(&track(2, 10, 1)).unwrap();
        store.save_track_batch(&track(1, 9, 1)).unwrap();
        store.save_track_batch(&track(2, 7, 1)).unwrap();

        let all = store.list_tracks(None).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].started_at <= w[1].started_at));

        let vehicle_two = store.list_tracks(Some(VehicleRef(2))).unwrap();
        assert_eq!(vehicle_two.len(), 2);
        assert!(vehicle_two.iter().all(|e| e.vehicle == VehicleRef(2)));
    }
}
