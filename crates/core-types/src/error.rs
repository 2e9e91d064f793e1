// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: String },

    #[error("A signal for candle time {time} is already in the log")]
    DuplicateSignal { time: i64 },
}

pub type Result<T> = std::result::Result<T, Error>;
