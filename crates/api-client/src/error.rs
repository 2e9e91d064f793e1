// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("API error: code {code}, msg: {msg}")]
    ApiError { code: i64, msg: String },
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Kline field `{field}` is not a number: {value:?}")]
    InvalidKline { field: &'static str, value: String },
    #[error(transparent)]
    MalformedCandle(#[from] core_types::Error),
    #[error("Market data unavailable after {attempts} attempt(s): {last_error}")]
    DataUnavailable { attempts: usize, last_error: String },
}

pub type Result<T> = std::result::Result<T, Error>;
