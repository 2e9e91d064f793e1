// In crates/strategies/src/ema_crossover.rs

use crate::{Assessment, Strategy};
use core_types::{EnrichedCandle, LeverageHint, Signal, SignalKind, SignalLog};

/// Fewest candles the detector will look at.
pub const MIN_CANDLES: usize = 3;
/// Distance of the take-profit from entry, in ATRs.
pub const TAKE_PROFIT_ATR: f64 = 2.0;
/// Distance of the stop-loss from entry, in ATRs.
pub const STOP_LOSS_ATR: f64 = 1.0;

/// Non-repainting fast/slow EMA crossover detector.
///
/// Only the last two rows of the window are inspected, and both are expected to
/// be closed candles. The detector's only memory is the session's `SignalLog`:
/// a crossover already recorded for the same candle time is not emitted again.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmaCrossover;

impl EmaCrossover {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for EmaCrossover {
    fn name(&self) -> &'static str {
        "EmaCrossover"
    }

    fn assess(&self, candles: &[EnrichedCandle], log: &mut SignalLog) -> Assessment {
        // 1. Need a closed prev/last pair and a defined ATR on the last one.
        if candles.len() < MIN_CANDLES {
            return Assessment::Warmup;
        }
        let prev = &candles[candles.len() - 2];
        let last = &candles[candles.len() - 1];

        let (Some(prev_fast), Some(prev_slow), Some(last_fast), Some(last_slow), Some(atr)) =
            (prev.ema_fast, prev.ema_slow, last.ema_fast, last.ema_slow, last.atr)
        else {
            return Assessment::Warmup;
        };

        let close = last.close();
        let atr_pct = 100.0 * atr / close;
        if close <= 0.0 || !atr_pct.is_finite() {
            return Assessment::Warmup;
        }

        // 2. The crossover itself.
        let Some(kind) = crossover((prev_fast, prev_slow), (last_fast, last_slow)) else {
            return Assessment::NoCrossover;
        };

        // 3. Dedup against the most recent entry.
        if log.last().is_some_and(|s| s.time == last.time()) {
            return Assessment::AlreadyRecorded(kind);
        }

        let signal = build_signal(kind, last.time(), close, atr, LeverageHint::from_atr_pct(atr_pct));
        match log.append(signal) {
            Ok(()) => Assessment::Emitted(signal),
            // The candle time was recorded earlier in the log.
            Err(_) => Assessment::AlreadyRecorded(kind),
        }
    }
}

/// Direction of a strict crossing between two consecutive `(fast, slow)` pairs.
///
/// An upward crossing is checked first, so it wins if both could ever hold.
pub fn crossover(prev: (f64, f64), last: (f64, f64)) -> Option<SignalKind> {
    let (prev_fast, prev_slow) = prev;
    let (last_fast, last_slow) = last;

    if prev_fast < prev_slow && last_fast > last_slow {
        Some(SignalKind::Buy)
    } else if prev_fast > prev_slow && last_fast < last_slow {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

/// Entry, take-profit and stop-loss levels for a signal at `price`.
pub fn build_signal(
    kind: SignalKind,
    time: i64,
    price: f64,
    atr: f64,
    leverage_hint: LeverageHint,
) -> Signal {
    let (take_profit, stop_loss) = match kind {
        SignalKind::Buy => (price + TAKE_PROFIT_ATR * atr, price - STOP_LOSS_ATR * atr),
        SignalKind::Sell => (price - TAKE_PROFIT_ATR * atr, price + STOP_LOSS_ATR * atr),
    };
    Signal {
        kind,
        time,
        price,
        take_profit,
        stop_loss,
        leverage_hint,
    }
}
