use super::error::DecodeError;
use crate::geo::GeoPoint;

const CHAR_OFFSET: i64 = 63;
const CONTINUATION: i64 = 0x1f;
const GROUP_BITS: u32 = 5;
const MAX_SHIFT: u32 = 62;

const COORDINATE_SCALE: f64 = 1e5;
const ELEVATION_SCALE: f64 = 100.0;

/// Decodes an encoded polyline into the ordered points it describes.
///
/// Latitude, longitude and (when `include_elevation` is set) elevation are
/// three delta-coded streams read in turn from the same cursor. An empty
/// string is an empty path; running out of input before a point is
/// complete is an error and no partial path is returned.
pub fn decode(encoded: &str, include_elevation: bool) -> Result<Vec<GeoPoint>, DecodeError> {
    let mut cursor = Cursor::new(encoded.as_bytes());
    let mut lat = Accumulator::default();
    let mut lon = Accumulator::default();
    let mut ele = Accumulator::default();
    let mut path = Vec::new();

    while !cursor.is_exhausted() {
        lat.apply(&mut cursor)?;
        lon.apply(&mut cursor)?;
        let elevation = if include_elevation {
            ele.apply(&mut cursor)?;
            Some(ele.value as f64 / ELEVATION_SCALE)
        } else {
            None
        };

        path.push(GeoPoint {
            latitude: lat.value as f64 / COORDINATE_SCALE,
            longitude: lon.value as f64 / COORDINATE_SCALE,
            elevation,
        });
    }

    Ok(path)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, index: 0 }
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.bytes.len()
    }

    /// Reads one variable-length codeword and returns its signed delta.
    fn next_delta(&mut self) -> Result<i64, DecodeError> {
        let offset = self.index;
        // Biased by +1, with each group read one below its classic value.
        let mut result: i64 = 1;
        let mut shift: u32 = 0;

        loop {
            let byte = *self
                .bytes
                .get(self.index)
                .ok_or(DecodeError::Truncated { offset })?;
            self.index += 1;

            if shift > MAX_SHIFT {
                return Err(DecodeError::Overflow { offset });
            }
            let group = i64::from(byte) - CHAR_OFFSET - 1;
            result = group
                .checked_mul(1_i64 << shift)
                .and_then(|part| result.checked_add(part))
                .ok_or(DecodeError::Overflow { offset })?;
            shift += GROUP_BITS;

            if group < CONTINUATION {
                break;
            }
        }

        Ok(if result & 1 != 0 {
            !(result >> 1)
        } else {
            result >> 1
        })
    }
}

#[derive(Default)]
struct Accumulator {
    value: i64,
}

impl Accumulator {
    fn apply(&mut self, cursor: &mut Cursor<'_>) -> Result<(), DecodeError> {
        let offset = cursor.index;
        let delta = cursor.next_delta()?;
        self.value = self
            .value
            .checked_add(delta)
            .ok_or(DecodeError::Overflow { offset })?;
        Ok(())
    }
}
