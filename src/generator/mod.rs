mod city;
mod error;
mod plan;
mod runner;

pub use city::City;
pub use error::GenerateError;
pub use plan::{plan_trips, random_start, random_trip, TripPlan};
pub use runner::{generate, GenerationSummary};
