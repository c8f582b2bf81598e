mod decoder;
mod error;

pub use decoder::decode;
pub use error::DecodeError;
