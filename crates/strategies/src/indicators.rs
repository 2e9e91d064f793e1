// In crates/strategies/src/indicators.rs

//! Indicator derivation for a candle window.
//!
//! EMA uses the adjusted (recursive-weighted) form:
//!   ema[t] = sum_{i<=t} (1-a)^(t-i) * x[i] / sum_{i<=t} (1-a)^(t-i),  a = 2/(span+1)
//! so every position is defined and the first value equals the first close.
//!
//! True Range needs a previous close and is undefined at index 0.
//! ATR is the simple mean of the last `atr_period` True Range values.

use anyhow::{Result, bail};
use core_types::{Candle, CandleSeries, EnrichedCandle};
use ta::indicators::{SimpleMovingAverage as Sma, TrueRange};
use ta::{Close, High, Low, Next};

use crate::types::EmaCrossoverSettings;

/// Borrowed view of a candle for the `ta` indicator traits.
struct Bar<'a>(&'a Candle);

impl High for Bar<'_> {
    fn high(&self) -> f64 {
        self.0.high
    }
}

impl Low for Bar<'_> {
    fn low(&self) -> f64 {
        self.0.low
    }
}

impl Close for Bar<'_> {
    fn close(&self) -> f64 {
        self.0.close
    }
}

/// Derives the fast/slow EMA and ATR columns for a candle window.
///
/// Holds no state between calls: each `enrich` starts from fresh indicator copies.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    settings: EmaCrossoverSettings,
    atr_window: Sma,
}

impl IndicatorEngine {
    pub fn new(settings: EmaCrossoverSettings) -> Result<Self> {
        if settings.ema_fast == 0 || settings.ema_slow == 0 {
            bail!(
                "EMA spans must be greater than 0 (fast = {}, slow = {})",
                settings.ema_fast,
                settings.ema_slow
            );
        }
        let atr_window = Sma::new(settings.atr_period).map_err(|e| {
            anyhow::anyhow!("Invalid ATR period {}: {:?}", settings.atr_period, e)
        })?;

        Ok(Self {
            settings,
            atr_window,
        })
    }

    pub fn settings(&self) -> &EmaCrossoverSettings {
        &self.settings
    }

    /// Produces one enriched row per candle, in the same order.
    pub fn enrich(&self, series: &CandleSeries) -> Vec<EnrichedCandle> {
        let closes = series.closes();
        let fast = ema(&closes, self.settings.ema_fast);
        let slow = ema(&closes, self.settings.ema_slow);
        let atr = self.atr(series.as_slice());

        series
            .iter()
            .zip(fast)
            .zip(slow)
            .zip(atr)
            .map(|(((candle, ema_fast), ema_slow), atr)| EnrichedCandle {
                candle: *candle,
                ema_fast: ema_fast.is_finite().then_some(ema_fast),
                ema_slow: ema_slow.is_finite().then_some(ema_slow),
                atr,
            })
            .collect()
    }

    /// ATR aligned with `candles`; `None` until `atr_period` True Range values exist.
    pub fn atr(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let period = self.settings.atr_period;
        let mut window = self.atr_window.clone();
        let mut seen = 0usize;

        true_range(candles)
            .into_iter()
            .map(|tr| {
                let tr = tr?;
                seen += 1;
                // Running-sum drift can dip a hair below zero on flat windows.
                let avg = window.next(tr).max(0.0);
                (seen >= period).then_some(avg)
            })
            .collect()
    }
}

/// Adjusted exponential moving average of `values` with the given span.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    values
        .iter()
        .map(|&x| {
            weighted_sum = x + decay * weighted_sum;
            weight_total = 1.0 + decay * weight_total;
            weighted_sum / weight_total
        })
        .collect()
}

/// True Range aligned with `candles`. Index 0 has no previous close and is `None`.
pub fn true_range(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut tr = TrueRange::new();
    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            // The first call only primes the previous close.
            let value = tr.next(&Bar(candle));
            (i > 0).then_some(value)
        })
        .collect()
}
