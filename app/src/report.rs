// In app/src/report.rs

use core_types::{EnrichedCandle, Signal};
use engine::Snapshot;
use strategies::Assessment;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders the dashboard for one refresh pass as plain text.
pub fn render_dashboard(snapshot: &Snapshot, candle_view: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "=== {} {} | EMA {}/{} ===",
        snapshot.symbol, snapshot.interval, snapshot.ema_fast, snapshot.ema_slow
    ));
    lines.push(format!(
        "Current price: {}{}",
        price_or_dash(snapshot.current_price),
        if snapshot.from_cache { " (cached)" } else { "" }
    ));
    lines.push(format!("Status: {}", describe(&snapshot.outcome)));

    lines.push(String::new());
    lines.push(format!(
        "{:<16} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "Time (UTC)", "Open", "High", "Low", "Close", "EMA fast", "EMA slow", "ATR"
    ));
    for candle in snapshot.recent_candles(candle_view) {
        lines.push(candle_row(candle));
    }

    lines.push(String::new());
    if snapshot.signals.is_empty() {
        lines.push("No signals yet.".to_string());
    } else {
        lines.push(format!(
            "{:<16} {:<5} {:>12} {:>12} {:>12} {:>8}",
            "Signal time", "Side", "Price", "Take profit", "Stop loss", "Leverage"
        ));
        for signal in &snapshot.signals {
            lines.push(signal_row(signal));
        }
    }

    lines.join("\n")
}

fn candle_row(candle: &EnrichedCandle) -> String {
    let c = &candle.candle;
    format!(
        "{:<16} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12} {:>12} {:>10}",
        format_time(c.open_time_utc(), c.open_time),
        c.open,
        c.high,
        c.low,
        c.close,
        price_or_dash(candle.ema_fast),
        price_or_dash(candle.ema_slow),
        price_or_dash(candle.atr),
    )
}

fn signal_row(signal: &Signal) -> String {
    format!(
        "{:<16} {:<5} {:>12.4} {:>12.4} {:>12.4} {:>8}",
        format_time(signal.time_utc(), signal.time),
        signal.kind.to_string(),
        signal.price,
        signal.take_profit,
        signal.stop_loss,
        signal.leverage_hint.to_string(),
    )
}

fn describe(outcome: &Assessment) -> String {
    match outcome {
        Assessment::Warmup => "warming up, not enough candles for the indicators".to_string(),
        Assessment::NoCrossover => "no crossover on the last closed candle".to_string(),
        Assessment::AlreadyRecorded(kind) => format!("{kind} crossover already recorded"),
        Assessment::Emitted(signal) => format!("new {} signal", signal.kind),
    }
}

fn format_time(time: Option<chrono::DateTime<chrono::Utc>>, raw_ms: i64) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| raw_ms.to_string())
}

fn price_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Candle, LeverageHint, SignalKind, Symbol};

    fn snapshot(outcome: Assessment, signals: Vec<Signal>) -> Snapshot {
        let candles = (0..3)
            .map(|i| EnrichedCandle {
                candle: Candle {
                    open_time: i * 7_200_000,
                    open: 10.0,
                    high: 11.0,
                    low: 9.0,
                    close: 10.5,
                    volume: 1.0,
                },
                ema_fast: Some(10.5),
                ema_slow: Some(10.25),
                atr: None,
            })
            .collect();

        Snapshot {
            symbol: Symbol("SOLUSDT".into()),
            interval: "2h".into(),
            ema_fast: 9,
            ema_slow: 21,
            candles,
            signals,
            current_price: Some(10.5),
            outcome,
            from_cache: false,
        }
    }

    #[test]
    fn dashboard_shows_title_price_and_candles() {
        let text = render_dashboard(&snapshot(Assessment::Warmup, vec![]), 2);

        assert!(text.starts_with("=== SOLUSDT 2h | EMA 9/21 ==="));
        assert!(text.contains("Current price: 10.5000"));
        assert!(text.contains("1970-01-01 02:00"));
        assert!(text.contains("1970-01-01 04:00"));
        // Only the newest two candles are shown.
        assert!(!text.contains("1970-01-01 00:00"));
        assert!(text.contains("No signals yet."));
    }

    #[test]
    fn dashboard_lists_signals() {
        let signal = Signal {
            kind: SignalKind::Sell,
            time: 14_400_000,
            price: 10.5,
            take_profit: 8.5,
            stop_loss: 11.5,
            leverage_hint: LeverageHint::X5,
        };
        let text = render_dashboard(&snapshot(Assessment::Emitted(signal), vec![signal]), 12);

        assert!(text.contains("Status: new SELL signal"));
        assert!(text.contains("SELL"));
        assert!(text.contains("5x"));
        assert!(text.contains("8.5000"));
    }

    #[test]
    fn missing_indicator_renders_as_dash() {
        assert_eq!(price_or_dash(None), "-");
        assert_eq!(price_or_dash(Some(1.23456)), "1.2346");
    }
}
