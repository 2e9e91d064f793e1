use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use api_client::MarketDataSource;
use app_config::Settings;
use async_trait::async_trait;
use core_types::{Candle, CandleSeries, SignalKind, Symbol};
use engine::{Error, RefreshMode, Session};
use strategies::Assessment;

const TWO_HOURS: i64 = 7_200_000;

enum Reply {
    Candles(Vec<Candle>),
    Down,
}

/// Replays a fixed list of responses and counts how often it was asked.
#[derive(Clone)]
struct ScriptedSource {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn fetch(&self, _: &Symbol, _: &str, _: u16) -> api_client::Result<CandleSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Candles(candles)) => Ok(CandleSeries::new(candles)?),
            Some(Reply::Down) | None => Err(api_client::Error::DataUnavailable {
                attempts: 3,
                last_error: "connection refused".into(),
            }),
        }
    }
}

fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            open_time: i as i64 * TWO_HOURS,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        })
        .collect()
}

/// Thirty falling closes followed by a spike: the fast EMA crosses up on the last candle.
fn buy_window() -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
    closes.push(200.0);
    candles(&closes)
}

fn steady_window() -> Vec<Candle> {
    let closes: Vec<f64> = (0..31).map(|i| 100.0 + i as f64).collect();
    candles(&closes)
}

fn session_with(source: &ScriptedSource, cache_ttl_secs: u64) -> Session {
    let mut settings = Settings::default();
    settings.binance.cache_ttl_secs = cache_ttl_secs;
    Session::new(&settings, Box::new(source.clone())).unwrap()
}

#[tokio::test]
async fn crossover_is_recorded_once_across_refreshes() {
    let source = ScriptedSource::new(vec![
        Reply::Candles(buy_window()),
        Reply::Candles(buy_window()),
    ]);
    let session = session_with(&source, 0);

    let first = session.refresh(RefreshMode::Forced).await.unwrap();
    let signal = first.new_signal().copied().unwrap();
    assert_eq!(signal.kind, SignalKind::Buy);
    assert_eq!(signal.time, 30 * TWO_HOURS);
    assert_eq!(first.signals, vec![signal]);
    assert_eq!(first.current_price, Some(200.0));

    let second = session.refresh(RefreshMode::Forced).await.unwrap();
    assert_eq!(second.outcome, Assessment::AlreadyRecorded(SignalKind::Buy));
    assert_eq!(second.signals.len(), 1);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn failed_refresh_leaves_session_untouched() {
    let source = ScriptedSource::new(vec![Reply::Candles(buy_window()), Reply::Down]);
    let session = session_with(&source, 0);

    session.refresh(RefreshMode::Forced).await.unwrap();
    let err = session.refresh(RefreshMode::Forced).await.unwrap_err();

    assert!(matches!(err, Error::DataUnavailable(_)));
    assert_eq!(session.signals(10).await.len(), 1);
    assert_eq!(session.current_price().await, Some(200.0));
}

#[tokio::test]
async fn out_of_order_rows_are_malformed() {
    let mut window = steady_window();
    window.swap(3, 4);
    let source = ScriptedSource::new(vec![Reply::Candles(window)]);
    let session = session_with(&source, 0);

    let err = session.refresh(RefreshMode::Forced).await.unwrap_err();

    assert!(matches!(err, Error::MalformedCandle(_)));
    assert_eq!(session.current_price().await, None);
}

#[tokio::test]
async fn scheduled_refresh_reuses_fresh_window() {
    let source = ScriptedSource::new(vec![
        Reply::Candles(steady_window()),
        Reply::Candles(steady_window()),
    ]);
    let session = session_with(&source, 60);

    let first = session.refresh(RefreshMode::Scheduled).await.unwrap();
    let second = session.refresh(RefreshMode::Scheduled).await.unwrap();
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(source.calls(), 1);
    assert_eq!(first.candles, second.candles);

    let forced = session.refresh(RefreshMode::Forced).await.unwrap();
    assert!(!forced.from_cache);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn zero_ttl_always_fetches() {
    let source = ScriptedSource::new(vec![
        Reply::Candles(steady_window()),
        Reply::Candles(steady_window()),
    ]);
    let session = session_with(&source, 0);

    session.refresh(RefreshMode::Scheduled).await.unwrap();
    let second = session.refresh(RefreshMode::Scheduled).await.unwrap();

    assert!(!second.from_cache);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn clearing_history_allows_nothing_but_new_signals() {
    let source = ScriptedSource::new(vec![
        Reply::Candles(buy_window()),
        Reply::Candles(steady_window()),
    ]);
    let session = session_with(&source, 0);

    session.refresh(RefreshMode::Forced).await.unwrap();
    assert_eq!(session.clear_signals().await, 1);
    assert!(session.signals(10).await.is_empty());

    let after = session.refresh(RefreshMode::Forced).await.unwrap();
    assert_eq!(after.outcome, Assessment::NoCrossover);
    assert!(after.signals.is_empty());
}

#[tokio::test]
async fn short_window_reports_warmup() {
    let source = ScriptedSource::new(vec![Reply::Candles(candles(&[10.0, 11.0, 12.0, 13.0]))]);
    let session = session_with(&source, 0);

    let snapshot = session.refresh(RefreshMode::Forced).await.unwrap();

    assert_eq!(snapshot.outcome, Assessment::Warmup);
    assert_eq!(snapshot.candles.len(), 4);
    assert!(snapshot.candles.iter().all(|c| c.atr.is_none()));
    assert_eq!(snapshot.recent_candles(2).len(), 2);
}

#[tokio::test]
async fn overlapping_refreshes_emit_one_signal() {
    let source = ScriptedSource::new(vec![
        Reply::Candles(buy_window()),
        Reply::Candles(buy_window()),
    ]);
    let session = Arc::new(session_with(&source, 0));

    let (a, b) = tokio::join!(
        session.refresh(RefreshMode::Forced),
        session.refresh(RefreshMode::Forced)
    );
    let emitted = [a.unwrap(), b.unwrap()]
        .iter()
        .filter(|s| s.new_signal().is_some())
        .count();

    assert_eq!(emitted, 1);
    assert_eq!(session.signals(10).await.len(), 1);
}
