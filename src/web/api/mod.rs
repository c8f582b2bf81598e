pub mod error;
pub mod live;
pub mod tracks;
