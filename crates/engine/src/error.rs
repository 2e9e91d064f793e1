// In crates/engine/src/error.rs

use thiserror::Error;

/// Why a refresh pass produced no update.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data unavailable: {0}")]
    DataUnavailable(#[source] api_client::Error),

    #[error("Malformed market data: {0}")]
    MalformedCandle(#[source] core_types::Error),
}

impl From<api_client::Error> for Error {
    fn from(err: api_client::Error) -> Self {
        match err {
            api_client::Error::MalformedCandle(inner) => Error::MalformedCandle(inner),
            other => Error::DataUnavailable(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
