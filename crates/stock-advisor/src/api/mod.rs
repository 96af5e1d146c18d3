//! API clients for market data and news

pub mod alpha_vantage;
pub mod serper;

pub use alpha_vantage::{AlphaVantageClient, MarketDataSource};
pub use serper::{NewsSource, SerperClient};
