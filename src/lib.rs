//! Synthetic vehicle GPS tracks: route a trip through a routing provider,
//! decode its geometry, timestamp every point and play the result into a
//! track store, either all at once or paced like a live feed.

pub mod config;
pub mod feed;
pub mod generator;
pub mod geo;
pub mod playback;
pub mod polyline;
pub mod route;
pub mod store;
pub mod track;
pub mod web;
