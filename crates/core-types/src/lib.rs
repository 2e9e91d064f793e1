// In crates/core-types/src/lib.rs

pub mod error;
pub mod signal_log;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use signal_log::SignalLog;
pub use types::{
    Candle, CandleSeries, EnrichedCandle, LeverageHint, Signal, SignalKind, Symbol,
};
