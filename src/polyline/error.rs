use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("polyline truncated mid-codeword at byte {offset}")]
    Truncated { offset: usize },
    #[error("polyline value at byte {offset} overflows")]
    Overflow { offset: usize },
}
