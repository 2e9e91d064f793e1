// In crates/core-types/src/types.rs

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A trading pair identifier as the exchange spells it (e.g. "SOLUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single OHLCV candle.
///
/// `open_time` is the candle's opening timestamp in epoch milliseconds and is
/// the identity of the candle within a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn open_time_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.open_time).single()
    }
}

/// An ordered window of candles with strictly increasing `open_time`.
///
/// A series is replaced wholesale on every refresh; there is no incremental merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Builds a series, rejecting candles whose timestamps do not strictly increase.
    ///
    /// OHLC consistency (`low <= open/close <= high`) is not checked; upstream
    /// data is taken as delivered.
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        for (index, pair) in candles.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.open_time <= prev.open_time {
                return Err(Error::MalformedCandle {
                    index: index + 1,
                    reason: format!(
                        "open_time {} does not follow previous open_time {}",
                        next.open_time, prev.open_time
                    ),
                });
            }
        }
        Ok(Self { candles })
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// A candle together with the indicator values derived for its position.
///
/// Indicator fields are `None` while their warm-up window is not yet filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnrichedCandle {
    #[serde(flatten)]
    pub candle: Candle,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub atr: Option<f64>,
}

impl EnrichedCandle {
    pub fn time(&self) -> i64 {
        self.candle.open_time
    }

    pub fn close(&self) -> f64 {
        self.candle.close
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => f.write_str("BUY"),
            SignalKind::Sell => f.write_str("SELL"),
        }
    }
}

/// Suggested position multiplier, bucketed by ATR as a percentage of price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverageHint {
    #[serde(rename = "20x")]
    X20,
    #[serde(rename = "10x")]
    X10,
    #[serde(rename = "5x")]
    X5,
    #[serde(rename = "3x")]
    X3,
}

impl LeverageHint {
    /// Maps a volatility percentage to a leverage bucket.
    ///
    /// Thresholds are evaluated low to high with a strict `<`, so a value that
    /// sits exactly on a boundary falls into the next (lower leverage) bucket.
    pub fn from_atr_pct(atr_pct: f64) -> Self {
        if atr_pct < 2.0 {
            LeverageHint::X20
        } else if atr_pct < 3.0 {
            LeverageHint::X10
        } else if atr_pct < 5.0 {
            LeverageHint::X5
        } else {
            LeverageHint::X3
        }
    }

    pub fn multiplier(&self) -> u8 {
        match self {
            LeverageHint::X20 => 20,
            LeverageHint::X10 => 10,
            LeverageHint::X5 => 5,
            LeverageHint::X3 => 3,
        }
    }
}

impl fmt::Display for LeverageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

/// A crossover signal emitted from a closed candle. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// `open_time` of the candle that confirmed the crossover.
    pub time: i64,
    pub price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub leverage_hint: LeverageHint,
}

impl Signal {
    pub fn time_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time).single()
    }
}
