// In crates/strategies/src/lib.rs

use core_types::{EnrichedCandle, Signal, SignalKind, SignalLog};
use serde::Serialize;

pub mod ema_crossover;
pub mod indicators;
pub mod types;

pub use ema_crossover::EmaCrossover;
pub use indicators::IndicatorEngine;
pub use types::EmaCrossoverSettings;

/// What a single detection pass concluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Assessment {
    /// Not enough data for the indicators the rule needs; nothing was evaluated.
    Warmup,
    /// Evaluated, and no crossover happened on the last candle.
    NoCrossover,
    /// A crossover fired but the log already holds a signal for that candle.
    AlreadyRecorded(SignalKind),
    /// A new signal was appended to the log.
    Emitted(Signal),
}

impl Assessment {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Assessment::Emitted(signal) => Some(signal),
            _ => None,
        }
    }
}

/// The universal interface for a signal strategy.
///
/// A strategy inspects an indicator-enriched candle window and appends at most
/// one new `Signal` to the session's log per call. Any memory it needs between
/// calls lives in that log, not in the strategy.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    fn assess(&self, candles: &[EnrichedCandle], log: &mut SignalLog) -> Assessment;
}
