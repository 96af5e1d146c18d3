//! Stock advice web application
//!
//! A visitor logs in, picks a ticker and gets back:
//!
//! - the latest intraday price and its change over the window (Alpha Vantage)
//! - an interactive closing-price chart (Plotly)
//! - a narrative produced by three role-playing LLM agents run in sequence
//!   (classifier, recommender, news researcher), fed with the price and with
//!   sentiment-scored articles found through Serper
//!
//! # Architecture
//!
//! Every outbound dependency sits behind a trait so the request flow in
//! [`StockAnalyzer`] can be exercised without the network:
//! [`MarketDataSource`], [`NewsSource`], [`ArticleFetcher`] and
//! [`AdvicePipeline`]. The axum router in [`web`] owns sessions, login and
//! page rendering.
//!
//! # Example
//!
//! ```rust,no_run
//! use stock_advisor::{AdvisorConfig, AppState, create_router};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AdvisorConfig::from_env()?;
//! let app = create_router(AppState::from_config(&config)?);
//! let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod api;
pub mod article;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod error;
pub mod market;
pub mod pipeline;
pub mod sentiment;
pub mod web;

pub use analysis::{AnalysisOutcome, AnalysisReport, StockAnalyzer};
pub use api::{AlphaVantageClient, MarketDataSource, NewsSource, SerperClient};
pub use article::{ArticleContent, ArticleFetcher, FetchFailure, HttpArticleFetcher};
pub use catalog::{SymbolCatalog, normalize_symbol};
pub use config::AdvisorConfig;
pub use error::{Result, StockError};
pub use market::{PriceChange, PricePoint, PriceSeries};
pub use pipeline::{AdvicePipeline, CrewPipeline, PipelineError, PipelineOutput, StockContext};
pub use sentiment::{NewsArticle, Sentiment, SentimentScorer};
pub use web::{AppState, create_router};
