//! Intraday price data model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used by Alpha Vantage and the chart axis
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One 5-minute bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Intraday bars for one symbol, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, sorting the points newest first
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Close of the most recent bar
    pub fn latest_close(&self) -> Option<f64> {
        self.points.first().map(|p| p.close)
    }

    /// Close of the oldest bar in the window
    pub fn oldest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Change from the oldest to the latest close
    ///
    /// `None` for an empty series or a zero reference price.
    pub fn price_change(&self) -> Option<PriceChange> {
        let latest = self.latest_close()?;
        let oldest = self.oldest_close()?;
        if oldest.abs() < f64::EPSILON {
            return None;
        }
        Some(PriceChange {
            percent: (latest - oldest) / oldest * 100.0,
        })
    }
}

/// Percentage change over the displayed window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub percent: f64,
}

impl PriceChange {
    /// Signed, two decimals: `+1.23%`, `-0.45%`
    pub fn text(&self) -> String {
        format!("{:+.2}%", self.percent)
    }

    /// CSS class used to color the change
    pub fn class(&self) -> &'static str {
        if self.percent >= 0.0 {
            "positive"
        } else {
            "negative"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: &str, close: f64) -> PricePoint {
        PricePoint {
            timestamp: NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_series_sorted_newest_first() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                point("2024-05-01 09:35:00", 190.0),
                point("2024-05-01 16:00:00", 195.0),
                point("2024-05-01 12:00:00", 192.0),
            ],
        );

        assert_eq!(series.latest_close(), Some(195.0));
        assert_eq!(series.oldest_close(), Some(190.0));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_price_change_positive() {
        let series = PriceSeries::new(
            "AAPL",
            vec![point("2024-05-01 09:35:00", 190.0), point("2024-05-01 16:00:00", 195.0)],
        );
        let change = series.price_change().unwrap();
        assert_eq!(change.text(), "+2.63%");
        assert_eq!(change.class(), "positive");
    }

    #[test]
    fn test_price_change_negative() {
        let change = PriceChange { percent: -0.4512 };
        assert_eq!(change.text(), "-0.45%");
        assert_eq!(change.class(), "negative");
    }

    #[test]
    fn test_flat_is_positive() {
        let change = PriceChange { percent: 0.0 };
        assert_eq!(change.text(), "+0.00%");
        assert_eq!(change.class(), "positive");
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty("AAPL");
        assert!(series.is_empty());
        assert_eq!(series.latest_close(), None);
        assert!(series.price_change().is_none());
    }

    #[test]
    fn test_single_point_has_zero_change() {
        let series = PriceSeries::new("AAPL", vec![point("2024-05-01 09:35:00", 190.0)]);
        assert_eq!(series.price_change().unwrap().text(), "+0.00%");
    }
}
