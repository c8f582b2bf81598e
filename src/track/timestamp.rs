use chrono::{DateTime, Duration, Utc};

use super::error::TrackError;
use super::types::TimestampedPoint;
use crate::geo::GeoPoint;

pub const DEFAULT_INTERVAL_SECONDS: u32 = 10;

/// Gives point `i` the visit time `started_at + i * interval_seconds`.
pub fn stamp(
    path: &[GeoPoint],
    started_at: DateTime<Utc>,
    interval_seconds: u32,
) -> Result<Vec<TimestampedPoint>, TrackError> {
    if interval_seconds == 0 {
        return Err(TrackError::InvalidInterval);
    }
    let step = Duration::seconds(i64::from(interval_seconds));

    path.iter()
        .zip(0..)
        .map(|(point, i)| {
            let visited_at = step
                .checked_mul(i)
                .and_then(|offset| started_at.checked_add_signed(offset))
                .ok_or(TrackError::OutOfRange { started_at })?;
            Ok(TimestampedPoint {
                point: *point,
                visited_at,
            })
        })
        .collect()
}
