// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EmaCrossoverSettings {
    /// Span of the fast EMA.
    pub ema_fast: usize,
    /// Span of the slow EMA.
    pub ema_slow: usize,
    /// Number of True Range values averaged into the ATR.
    pub atr_period: usize,
}

impl Default for EmaCrossoverSettings {
    fn default() -> Self {
        Self {
            ema_fast: 9,
            ema_slow: 21,
            atr_period: 14,
        }
    }
}
