// In crates/engine/src/lib.rs

pub mod cache;
pub mod error;

use std::time::{Duration, Instant};

use api_client::MarketDataSource;
use app_config::Settings;
use core_types::{EnrichedCandle, Signal, SignalLog, Symbol};
use serde::Serialize;
use strategies::{Assessment, EmaCrossover, IndicatorEngine, Strategy};
use tokio::sync::Mutex;

pub use cache::CachedSeries;
pub use error::{Error, Result};

/// Whether a refresh may reuse a recently fetched window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Periodic tick; honours the cache TTL.
    Scheduled,
    /// Operator request; always goes to the source.
    Forced,
}

/// Everything a view needs after one refresh pass.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub symbol: Symbol,
    pub interval: String,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub candles: Vec<EnrichedCandle>,
    /// Newest first.
    pub signals: Vec<Signal>,
    pub current_price: Option<f64>,
    pub outcome: Assessment,
    pub from_cache: bool,
}

impl Snapshot {
    pub fn new_signal(&self) -> Option<&Signal> {
        self.outcome.signal()
    }

    /// The newest `n` enriched candles, oldest first.
    pub fn recent_candles(&self, n: usize) -> &[EnrichedCandle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }
}

#[derive(Debug, Default)]
struct SessionState {
    log: SignalLog,
    cache: Option<CachedSeries>,
    latest: Vec<EnrichedCandle>,
}

/// One monitored symbol/interval pair and its signal history.
///
/// Refresh passes are serialized by the state lock, so two overlapping
/// triggers can never append the same signal twice.
pub struct Session {
    symbol: Symbol,
    interval: String,
    limit: u16,
    cache_ttl: Duration,
    signal_view: usize,
    source: Box<dyn MarketDataSource + Send + Sync>,
    indicators: IndicatorEngine,
    strategy: Box<dyn Strategy + Send + Sync>,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(
        settings: &Settings,
        source: Box<dyn MarketDataSource + Send + Sync>,
    ) -> anyhow::Result<Self> {
        let indicators = IndicatorEngine::new(settings.strategy.clone())?;

        tracing::info!(
            symbol = %settings.market.symbol(),
            interval = %settings.market.interval,
            source = source.name(),
            strategy = EmaCrossover.name(),
            "Session initialized."
        );

        Ok(Self {
            symbol: settings.market.symbol(),
            interval: settings.market.interval.clone(),
            limit: settings.market.limit,
            cache_ttl: Duration::from_secs(settings.binance.cache_ttl_secs),
            signal_view: settings.session.signal_view,
            source,
            indicators,
            strategy: Box::new(EmaCrossover),
            state: Mutex::new(SessionState::default()),
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    /// Runs one fetch, enrich and detect pass.
    ///
    /// On error nothing in the session changes: the signal log, the cache
    /// and the last published candles all stay as they were.
    pub async fn refresh(&self, mode: RefreshMode) -> Result<Snapshot> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let now = Instant::now();

        let cached = match mode {
            RefreshMode::Scheduled => state
                .cache
                .as_ref()
                .filter(|entry| entry.is_fresh(now, self.cache_ttl))
                .map(|entry| entry.value.clone()),
            RefreshMode::Forced => None,
        };

        let (series, from_cache) = match cached {
            Some(series) => {
                tracing::debug!(symbol = %self.symbol, "Reusing cached candle window.");
                (series, true)
            }
            None => {
                let series = self
                    .source
                    .fetch(&self.symbol, &self.interval, self.limit)
                    .await
                    .map_err(|e| {
                        tracing::warn!(symbol = %self.symbol, error = %e, "Refresh failed.");
                        Error::from(e)
                    })?;
                state.cache = Some(CachedSeries::new(series.clone(), now));
                (series, false)
            }
        };

        let candles = self.indicators.enrich(&series);
        let outcome = self.strategy.assess(&candles, &mut state.log);

        match &outcome {
            Assessment::Emitted(signal) => tracing::info!(
                symbol = %self.symbol,
                kind = %signal.kind,
                price = signal.price,
                take_profit = signal.take_profit,
                stop_loss = signal.stop_loss,
                leverage = %signal.leverage_hint,
                "New signal."
            ),
            Assessment::Warmup => tracing::debug!(
                symbol = %self.symbol,
                candles = candles.len(),
                "Indicators still warming up."
            ),
            _ => {}
        }

        state.latest = candles;

        Ok(Snapshot {
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            ema_fast: self.indicators.settings().ema_fast,
            ema_slow: self.indicators.settings().ema_slow,
            current_price: state.latest.last().map(EnrichedCandle::close),
            candles: state.latest.clone(),
            signals: state.log.tail(self.signal_view),
            outcome,
            from_cache,
        })
    }

    /// Empties the signal history. Returns how many entries were dropped.
    pub async fn clear_signals(&self) -> usize {
        let mut state = self.state.lock().await;
        let dropped = state.log.len();
        state.log.clear();
        tracing::info!(symbol = %self.symbol, dropped, "Signal history cleared.");
        dropped
    }

    /// The newest `n` signals, newest first.
    pub async fn signals(&self, n: usize) -> Vec<Signal> {
        self.state.lock().await.log.tail(n)
    }

    /// The close of the newest candle from the last successful refresh.
    pub async fn current_price(&self) -> Option<f64> {
        self.state.lock().await.latest.last().map(EnrichedCandle::close)
    }
}
