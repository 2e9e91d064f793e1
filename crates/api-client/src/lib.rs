// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::types::BinanceSettings;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Candle, CandleSeries, Symbol};

pub mod error;
pub mod klines;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// Binance rejects klines requests above this many rows.
const MAX_REQUEST_ROWS: u16 = 1000;

/// The universal interface for a source of candle windows.
///
/// A source either returns a complete, ordered window or fails; it never hands
/// back a partial series. Retries and failover are the source's business.
#[async_trait]
pub trait MarketDataSource {
    /// The name of the source (e.g., "BinanceSpot").
    fn name(&self) -> &'static str;

    /// Fetches the latest `limit` closed candles for `symbol` at `interval`.
    ///
    /// Fails with `Error::DataUnavailable` when no endpoint could produce data,
    /// and with `Error::MalformedCandle` when the delivered rows are out of order.
    async fn fetch(&self, symbol: &Symbol, interval: &str, limit: u16) -> Result<CandleSeries>;
}

impl BinanceClient {
    /// Constructs a new BinanceClient from BinanceSettings.
    pub fn new(settings: &BinanceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(BinanceClient {
            http_client,
            mirrors: settings.mirrors.clone(),
        })
    }

    /// Fetches klines from a single mirror.
    ///
    /// This corresponds to the `GET /api/v3/klines` endpoint. One extra row is
    /// requested so that dropping the still-forming candle leaves `limit` closed ones.
    pub async fn get_klines_from(
        &self,
        base_url: &str,
        symbol: &Symbol,
        interval: &str,
        limit: u16,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", base_url.trim_end_matches('/'));
        let request_rows = limit.saturating_add(1).min(MAX_REQUEST_ROWS).to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("symbol", symbol.0.as_str()),
                ("interval", interval),
                ("limit", request_rows.as_str()),
            ])
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let server_date = response
            .headers()
            .get(reqwest::header::DATE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let status = response.status();
        let body = response.text().await.map_err(Error::RequestFailed)?;

        let cutoff = klines::cutoff_ms(Utc::now().timestamp_millis(), server_date.as_deref());
        klines::parse_klines(status, &body, cutoff, usize::from(limit))
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    fn name(&self) -> &'static str {
        "BinanceSpot"
    }

    async fn fetch(&self, symbol: &Symbol, interval: &str, limit: u16) -> Result<CandleSeries> {
        let mut last_error = None;
        let mut attempts = 0;

        for base_url in &self.mirrors {
            attempts += 1;
            match self.get_klines_from(base_url, symbol, interval, limit).await {
                Ok(candles) => {
                    tracing::debug!(mirror = %base_url, count = candles.len(), "Klines received.");
                    // Every mirror serves the same data, so ordering problems are not retried.
                    return Ok(CandleSeries::new(candles)?);
                }
                Err(e) => {
                    tracing::warn!(mirror = %base_url, error = %e, "Kline request failed, trying next mirror.");
                    last_error = Some(e);
                }
            }
        }

        Err(Error::DataUnavailable {
            attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no mirrors configured".to_string()),
        })
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &BinanceSettings) -> Result<BinanceClient> {
    BinanceClient::new(settings)
}
