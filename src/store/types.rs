use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::track::{Track, VehicleRef};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl TrackId {
    /// `<start time>_<uuid>`, so ids sort roughly by start.
    pub fn generate(started_at: DateTime<Utc>) -> Self {
        let uuid = uuid::Uuid::new_v4();
        // Years past 9999 are formatted with a leading '+'.
        let timestamp = started_at.format("%Y%m%dT%H%M%SZ").to_string().replace('+', "");
        TrackId(format!("{}_{}", timestamp, uuid))
    }

    /// Accepts only ids that are safe to use as file names.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| TrackId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Track header as stored, without its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrackEntry {
    pub id: TrackId,
    pub vehicle: VehicleRef,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TrackEntry {
    pub fn new(id: TrackId, track: &Track) -> Self {
        Self {
            id,
            vehicle: track.vehicle,
            started_at: track.started_at,
            finished_at: track.finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn generated_ids_are_parseable() {
        let started = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let id = TrackId::generate(started);
        assert!(id.as_str().starts_with("20200102T030405Z_"));
        assert_eq!(TrackId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn far_future_ids_are_parseable() {
        let started = Utc.with_ymd_and_hms(12000, 1, 1, 0, 0, 0).unwrap();
        let id = TrackId::generate(started);
        assert!(id.as_str().starts_with("120000101T000000Z_"));
        assert_eq!(TrackId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn rejects_path_like_ids() {
        assert_eq!(TrackId::parse("../etc/passwd"), None);
        assert_eq!(TrackId::parse("a.json"), None);
        assert_eq!(TrackId::parse(""), None);
    }
}
