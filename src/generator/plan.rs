use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::city::City;
use crate::route::RouteRequest;
use crate::track::VehicleRef;

// 2000-01-01T00:00:00Z and 2024-01-01T00:00:00Z.
const EARLIEST_START: i64 = 946_684_800;
const LATEST_START: i64 = 1_704_067_200;

const MIN_SPEED_KMH: u32 = 40;
const MAX_SPEED_KMH: u32 = 120;

/// Everything needed to assemble one synthetic trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub vehicle: VehicleRef,
    pub request: RouteRequest,
    pub started_at: DateTime<Utc>,
}

pub fn random_start(rng: &mut impl Rng) -> DateTime<Utc> {
    let seconds = rng.random_range(EARLIEST_START..LATEST_START);
    DateTime::UNIX_EPOCH + Duration::seconds(seconds)
}

pub fn random_trip(rng: &mut impl Rng, vehicle: VehicleRef, city: City) -> TripPlan {
    let start = city.random_point(rng);
    let finish = city.random_point(rng);
    let max_speed_kmh = rng.random_range(MIN_SPEED_KMH..MAX_SPEED_KMH);

    TripPlan {
        vehicle,
        request: RouteRequest::new(start, finish, max_speed_kmh),
        started_at: random_start(rng),
    }
}

/// `tracks_per_vehicle` random trips for each vehicle, vehicle by vehicle.
pub fn plan_trips(
    rng: &mut impl Rng,
    vehicles: &[VehicleRef],
    city: City,
    tracks_per_vehicle: usize,
) -> Vec<TripPlan> {
    vehicles
        .iter()
        .flat_map(|vehicle| std::iter::repeat(*vehicle).take(tracks_per_vehicle))
        .map(|vehicle| random_trip(&mut *rng, vehicle, city))
        .collect()
}
