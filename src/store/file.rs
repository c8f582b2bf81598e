use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use log::error;

use super::error::StoreError;
use super::types::{TrackEntry, TrackId};
use super::TrackStore;
use crate::track::{TimestampedPoint, Track, VehicleRef};

const HEADER_EXTENSION: &str = "json";
const POINTS_SUFFIX: &str = ".points.jsonl";

/// Stores each track as a JSON header plus an append-only JSON-lines file
/// of points, both under `base`.
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        FileStore { base }
    }

    fn header_path(&self, id: &TrackId) -> PathBuf {
        self.base.join(format!("{}.{}", id, HEADER_EXTENSION))
    }

    fn points_path(&self, id: &TrackId) -> PathBuf {
        self.base.join(format!("{}{}", id, POINTS_SUFFIX))
    }

    fn write_header(&self, track: &Track) -> Result<TrackId, StoreError> {
        std::fs::create_dir_all(&self.base)?;

        let id = TrackId::generate(track.started_at);
        let entry = TrackEntry::new(id.clone(), track);
        std::fs::write(self.header_path(&id), serde_json::to_vec_pretty(&entry)?)?;
        // Create the points file up front so an empty track is still complete.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.points_path(&id))?;
        Ok(id)
    }

    fn append_points<'a>(
        &self,
        id: &TrackId,
        points: impl IntoIterator<Item = &'a TimestampedPoint>,
    ) -> Result<(), StoreError> {
        let header = self.header_path(id);
        if !header.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }

        let mut buffer = Vec::new();
        for point in points {
            serde_json::to_writer(&mut buffer, point)?;
            buffer.push(b'\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.points_path(id))?;
        file.write_all(&buffer)?;
        Ok(())
    }

    fn read_entry(&self, id: &TrackId) -> Result<TrackEntry, StoreError> {
        let path = self.header_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.clone()));
        }
        let content = std::fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }
}

impl TrackStore for FileStore {
    fn save_track_batch(&self, track: &Track) -> Result<TrackId, StoreError> {
        let id = self.write_header(track)?;
        self.append_points(&id, &track.points)?;
        Ok(id)
    }

    fn save_track_shell(&self, track: &Track) -> Result<TrackId, StoreError> {
        self.write_header(track)
    }

    fn save_point(&self, id: &TrackId, point: &TimestampedPoint) -> Result<(), StoreError> {
        self.append_points(id, [point])
    }

    fn load_track(&self, id: &TrackId) -> Result<Track, StoreError> {
        let entry = self.read_entry(id)?;

        let mut points = Vec::new();
        let path = self.points_path(id);
        if path.exists() {
            let reader = BufReader::new(std::fs::File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                points.push(serde_json::from_str(&line)?);
            }
        }

        Ok(Track {
            vehicle: entry.vehicle,
            started_at: entry.started_at,
            finished_at: entry.finished_at,
            points,
        })
    }

    fn list_tracks(&self, vehicle: Option<VehicleRef>) -> Result<Vec<TrackEntry>, StoreError> {
        if !self.base.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in self.base.read_dir()? {
            let path = dir_entry?.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(HEADER_EXTENSION)
            {
                continue;
            }

            let content = match std::fs::read(&path) {
                Ok(content) => content,
                Err(e) => {
                    error!("Failed to read track header {}: {}", path.display(), e);
                    continue;
                }
            };

            let entry: TrackEntry = match serde_json::from_slice(&content) {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Failed to parse track header {}: {}", path.display(), e);
                    continue;
                }
            };

            if vehicle.map_or(true, |v| entry.vehicle == v) {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| a.started_at.cmp(&b.started_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }
}
