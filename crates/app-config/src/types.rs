// In crates/app-config/src/types.rs

use serde::Deserialize;

use core_types::Symbol;
pub use strategies::types::EmaCrossoverSettings;

use crate::{Error, Result};

/// Binance spot caps a klines request at 1000 rows; one is reserved for the
/// still-forming candle that gets dropped.
pub const MAX_LIMIT: u16 = 999;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Which instrument and window to track.
    pub market: MarketSettings,
    /// Settings for the Binance REST API.
    pub binance: BinanceSettings,
    /// Indicator spans and periods.
    pub strategy: EmaCrossoverSettings,
    /// Interactive session behaviour.
    pub session: SessionSettings,
}

impl Settings {
    /// Rejects values the signal engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let strategy = &self.strategy;
        if strategy.ema_fast == 0 || strategy.ema_slow == 0 || strategy.atr_period == 0 {
            return Err(Error::Invalid(
                "strategy.ema_fast, strategy.ema_slow and strategy.atr_period must be greater than 0"
                    .into(),
            ));
        }
        if strategy.ema_fast >= strategy.ema_slow {
            return Err(Error::Invalid(format!(
                "strategy.ema_fast ({}) must be shorter than strategy.ema_slow ({})",
                strategy.ema_fast, strategy.ema_slow
            )));
        }
        if self.market.symbol.trim().is_empty() || self.market.interval.trim().is_empty() {
            return Err(Error::Invalid("market.symbol and market.interval must be set".into()));
        }
        if !(3..=MAX_LIMIT).contains(&self.market.limit) {
            return Err(Error::Invalid(format!(
                "market.limit must be between 3 and {MAX_LIMIT}, got {}",
                self.market.limit
            )));
        }
        if self.binance.mirrors.is_empty() {
            return Err(Error::Invalid("binance.mirrors must list at least one base URL".into()));
        }
        if self.binance.request_timeout_secs == 0 {
            return Err(Error::Invalid("binance.request_timeout_secs must be greater than 0".into()));
        }
        if self.session.signal_view == 0 || self.session.candle_view == 0 {
            return Err(Error::Invalid(
                "session.signal_view and session.candle_view must be greater than 0".into(),
            ));
        }
        if self.session.refresh_interval_secs == 0 {
            return Err(Error::Invalid("session.refresh_interval_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            log_level: "info".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MarketSettings {
    /// The trading pair (e.g., "SOLUSDT").
    pub symbol: String,
    /// The kline interval (e.g., "15m", "2h").
    pub interval: String,
    /// How many closed candles make up the window.
    pub limit: u16,
}

impl MarketSettings {
    pub fn symbol(&self) -> Symbol {
        Symbol(self.symbol.trim().to_uppercase())
    }
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            symbol: "SOLUSDT".into(),
            interval: "2h".into(),
            limit: 200,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BinanceSettings {
    /// REST base URLs, tried in order until one answers.
    pub mirrors: Vec<String>,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// How long a fetched window is reused before hitting the API again.
    pub cache_ttl_secs: u64,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            mirrors: vec![
                "https://api1.binance.com".into(),
                "https://api2.binance.com".into(),
                "https://api3.binance.com".into(),
            ],
            request_timeout_secs: 10,
            cache_ttl_secs: 30,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SessionSettings {
    /// Seconds between automatic refresh passes in `watch` mode.
    pub refresh_interval_secs: u64,
    /// How many signals the dashboard shows, newest first.
    pub signal_view: usize,
    /// How many of the latest candles the dashboard prints.
    pub candle_view: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            signal_view: 10,
            candle_view: 12,
        }
    }
}
