mod error;
mod feed;

pub use error::FeedError;
pub use feed::{FeedStatus, LiveFeed};
