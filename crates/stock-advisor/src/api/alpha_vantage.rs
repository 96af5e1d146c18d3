//! Alpha Vantage intraday client

use crate::error::{Result, StockError};
use crate::market::{PricePoint, PriceSeries, TIMESTAMP_FORMAT};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const INTERVAL: &str = "5min";
const SERIES_KEY: &str = "Time Series (5min)";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Source of intraday price bars
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 5-minute bars for `symbol`, newest first
    ///
    /// An unknown symbol yields an empty series, not an error.
    async fn intraday(&self, symbol: &str) -> Result<PriceSeries>;
}

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl RawBar {
    fn into_point(self, timestamp: &str) -> Option<PricePoint> {
        Some(PricePoint {
            timestamp: NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?,
            open: self.open.trim().parse().ok()?,
            high: self.high.trim().parse().ok()?,
            low: self.low.trim().parse().ok()?,
            close: self.close.trim().parse().ok()?,
            volume: self.volume.trim().parse().ok()?,
        })
    }
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (free tier: 5)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let per_minute = NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            rate_limiter,
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl MarketDataSource for AlphaVantageClient {
    #[instrument(skip(self))]
    async fn intraday(&self, symbol: &str) -> Result<PriceSeries> {
        self.rate_limiter.until_ready().await;

        let params = HashMap::from([
            ("function", "TIME_SERIES_INTRADAY"),
            ("symbol", symbol),
            ("interval", INTERVAL),
            ("outputsize", "compact"),
            ("apikey", self.api_key.as_str()),
        ]);

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StockError::AlphaVantage(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        let series = parse_intraday(symbol, &data)?;
        debug!(points = series.len(), "fetched intraday series");
        Ok(series)
    }
}

/// Turn an intraday payload into a series
///
/// `"Error Message"` (unknown symbol) and a payload without the series key
/// both mean "no data". `"Note"` is the rate-limit notice. Bars that do not
/// parse are skipped.
pub fn parse_intraday(symbol: &str, data: &Value) -> Result<PriceSeries> {
    if let Some(message) = data.get("Error Message") {
        warn!(symbol, %message, "Alpha Vantage rejected the symbol");
        return Ok(PriceSeries::empty(symbol));
    }

    if data.get("Note").is_some() {
        return Err(StockError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    if let Some(information) = data.get("Information").and_then(Value::as_str) {
        return Err(StockError::AlphaVantage(information.to_string()));
    }

    let Some(bars) = data.get(SERIES_KEY).and_then(Value::as_object) else {
        return Ok(PriceSeries::empty(symbol));
    };

    let mut points = Vec::with_capacity(bars.len());
    for (timestamp, raw) in bars {
        let point = serde_json::from_value::<RawBar>(raw.clone())
            .ok()
            .and_then(|bar| bar.into_point(timestamp));
        match point {
            Some(point) => points.push(point),
            None => warn!(symbol, %timestamp, "skipping malformed bar"),
        }
    }

    Ok(PriceSeries::new(symbol, points))
}
