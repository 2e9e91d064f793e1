// In crates/api-client/src/klines.rs

use chrono::DateTime;
use core_types::Candle;
use reqwest::StatusCode;

use crate::types::{ApiErrorBody, RawKline};
use crate::{Error, Result};

/// The instant rows must have closed by: the earlier of the local clock and the
/// server's HTTP `Date` header, so a host clock running ahead cannot let the
/// forming candle through.
pub fn cutoff_ms(local_ms: i64, server_date: Option<&str>) -> i64 {
    server_date
        .and_then(|date| DateTime::parse_from_rfc2822(date).ok())
        .map_or(local_ms, |date| date.timestamp_millis().min(local_ms))
}

/// Turns a klines response body into closed candles.
///
/// Rows whose `close_time` has not passed yet (`>= now_ms`) are still forming
/// and are dropped. At most the last `limit` closed rows are kept.
pub fn parse_klines(status: StatusCode, body: &str, now_ms: i64, limit: usize) -> Result<Vec<Candle>> {
    if !status.is_success() {
        return Err(match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => Error::ApiError { code: err.code, msg: err.msg },
            Err(_) => Error::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            },
        });
    }

    let raw_klines: Vec<RawKline> = serde_json::from_str(body).map_err(|e| {
        // If deserialization fails, it might be a Binance error object.
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => Error::ApiError { code: err.code, msg: err.msg },
            Err(_) => Error::DeserializationFailed(e),
        }
    })?;

    let mut candles = raw_klines
        .into_iter()
        .filter(|raw| raw.6 < now_ms)
        .map(to_candle)
        .collect::<Result<Vec<_>>>()?;

    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
    Ok(candles)
}

fn to_candle(raw: RawKline) -> Result<Candle> {
    Ok(Candle {
        open_time: raw.0,
        open: parse_price("open", &raw.1)?,
        high: parse_price("high", &raw.2)?,
        low: parse_price("low", &raw.3)?,
        close: parse_price("close", &raw.4)?,
        volume: parse_price("volume", &raw.5)?,
    })
}

fn parse_price(field: &'static str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidKline {
            field,
            value: value.to_string(),
        })
}
