//! One stock submission, from price data to narrative

use crate::api::{MarketDataSource, NewsSource};
use crate::article::ArticleFetcher;
use crate::chart::render_price_chart;
use crate::market::PriceChange;
use crate::pipeline::{AdvicePipeline, PipelineError, PipelineOutput, StockContext};
use crate::sentiment::{NewsArticle, SentimentScorer, annotate_articles};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Result of analysing one symbol
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The market data source returned no bars
    NoData { symbol: String },
    /// The market data source failed
    MarketDataFailed { symbol: String, error: String },
    Analyzed(AnalysisReport),
}

impl AnalysisOutcome {
    /// Message shown instead of a report, if any
    pub fn message(&self) -> Option<String> {
        match self {
            Self::NoData { symbol } => Some(format!("No data available for symbol {symbol}")),
            Self::MarketDataFailed { symbol, error } => {
                Some(format!("Unable to fetch market data for {symbol}: {error}"))
            }
            Self::Analyzed(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct AnalysisReport {
    pub symbol: String,
    pub latest_price: f64,
    pub change: Option<PriceChange>,
    /// `None` when the chart could not be rendered
    pub chart_html: Option<String>,
    pub articles: Vec<NewsArticle>,
    pub narrative: Result<PipelineOutput, PipelineError>,
}

impl AnalysisReport {
    /// Narrative text, or the execution error in its place
    pub fn narrative_text(&self) -> String {
        match &self.narrative {
            Ok(output) => output.narrative().to_string(),
            Err(e) => format!("Error during execution: {e}"),
        }
    }
}

/// Runs the per-request analysis against injected collaborators
#[derive(Clone)]
pub struct StockAnalyzer {
    market: Arc<dyn MarketDataSource>,
    news: Arc<dyn NewsSource>,
    articles: Arc<dyn ArticleFetcher>,
    scorer: SentimentScorer,
    pipeline: Arc<dyn AdvicePipeline>,
}

impl StockAnalyzer {
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        news: Arc<dyn NewsSource>,
        articles: Arc<dyn ArticleFetcher>,
        pipeline: Arc<dyn AdvicePipeline>,
    ) -> Self {
        Self {
            market,
            news,
            articles,
            scorer: SentimentScorer::new(),
            pipeline,
        }
    }

    /// Analyse an already normalized symbol
    ///
    /// An empty series stops here: no news lookup, no agents, no chart.
    #[instrument(skip(self))]
    pub async fn analyze(&self, symbol: &str, request_id: &str) -> AnalysisOutcome {
        let series = match self.market.intraday(symbol).await {
            Ok(series) => series,
            Err(e) => {
                error!(error = %e, "market data request failed");
                return AnalysisOutcome::MarketDataFailed {
                    symbol: symbol.to_string(),
                    error: e.to_string(),
                };
            }
        };

        let Some(latest_price) = series.latest_close() else {
            warn!("no intraday data");
            return AnalysisOutcome::NoData {
                symbol: symbol.to_string(),
            };
        };

        let links = self.news.recent_news(symbol).await;
        let articles = annotate_articles(self.articles.as_ref(), &self.scorer, &links).await;

        let context = StockContext {
            symbol: symbol.to_string(),
            price: latest_price,
            articles: articles.iter().map(NewsArticle::annotation).collect(),
        };
        let narrative = self.pipeline.run(&context, request_id).await;
        if let Err(e) = &narrative {
            error!(error = %e, "advice pipeline failed");
        }

        let chart_html = render_price_chart(&series)
            .inspect_err(|e| error!(error = %e, "chart rendering failed"))
            .ok();

        info!(
            price = latest_price,
            articles = articles.len(),
            ok = narrative.is_ok(),
            "analysis finished"
        );

        AnalysisOutcome::Analyzed(AnalysisReport {
            symbol: symbol.to_string(),
            latest_price,
            change: series.price_change(),
            chart_html,
            articles,
            narrative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::alpha_vantage::MockMarketDataSource;
    use crate::api::serper::MockNewsSource;
    use crate::article::{ArticleContent, FetchFailure, MockArticleFetcher};
    use crate::error::StockError;
    use crate::market::{PricePoint, PriceSeries, TIMESTAMP_FORMAT};
    use crate::pipeline::MockAdvicePipeline;
    use chrono::NaiveDateTime;

    fn aapl() -> PriceSeries {
        let point = |ts: &str, close: f64| PricePoint {
            timestamp: NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10,
        };
        PriceSeries::new(
            "AAPL",
            vec![point("2024-05-01 09:35:00", 190.0), point("2024-05-01 16:00:00", 195.0)],
        )
    }

    fn output() -> PipelineOutput {
        PipelineOutput {
            classification: "Bullish".to_string(),
            recommendation: "Buy".to_string(),
            insights: "1. Strong demand".to_string(),
        }
    }

    fn analyzer(
        market: MockMarketDataSource,
        news: MockNewsSource,
        articles: MockArticleFetcher,
        pipeline: MockAdvicePipeline,
    ) -> StockAnalyzer {
        StockAnalyzer::new(
            Arc::new(market),
            Arc::new(news),
            Arc::new(articles),
            Arc::new(pipeline),
        )
    }

    #[tokio::test]
    async fn test_empty_series_stops_early() {
        let mut market = MockMarketDataSource::new();
        market
            .expect_intraday()
            .returning(|s| Ok(PriceSeries::empty(s)));
        let mut news = MockNewsSource::new();
        news.expect_recent_news().never();
        let mut pipeline = MockAdvicePipeline::new();
        pipeline.expect_run().never();

        let outcome = analyzer(market, news, MockArticleFetcher::new(), pipeline)
            .analyze("ZZZZ", "req")
            .await;

        assert!(matches!(outcome, AnalysisOutcome::NoData { .. }));
        assert_eq!(outcome.message().unwrap(), "No data available for symbol ZZZZ");
    }

    #[tokio::test]
    async fn test_market_error_reported() {
        let mut market = MockMarketDataSource::new();
        market.expect_intraday().returning(|_| {
            Err(StockError::RateLimitExceeded {
                provider: "Alpha Vantage".to_string(),
            })
        });
        let mut pipeline = MockAdvicePipeline::new();
        pipeline.expect_run().never();

        let outcome = analyzer(market, MockNewsSource::new(), MockArticleFetcher::new(), pipeline)
            .analyze("AAPL", "req")
            .await;

        assert_eq!(
            outcome.message().unwrap(),
            "Unable to fetch market data for AAPL: Rate limit exceeded for Alpha Vantage"
        );
    }

    #[tokio::test]
    async fn test_full_analysis() {
        let mut market = MockMarketDataSource::new();
        market.expect_intraday().returning(|_| Ok(aapl()));

        let mut news = MockNewsSource::new();
        news.expect_recent_news().times(1).returning(|_| {
            vec![
                "https://news.example/good".to_string(),
                "https://news.example/gone".to_string(),
            ]
        });

        let mut articles = MockArticleFetcher::new();
        articles
            .expect_fetch()
            .withf(|url| url.to_string() == "https://news.example/good")
            .returning(|_| ArticleContent::Text("Apple shares rose on strong growth".to_string()));
        articles
            .expect_fetch()
            .withf(|url| url.to_string() == "https://news.example/gone")
            .returning(|_| ArticleContent::Unavailable(FetchFailure::Status(404)));

        let mut pipeline = MockAdvicePipeline::new();
        pipeline
            .expect_run()
            .withf(|ctx, id| {
                ctx.symbol == "AAPL"
                    && (ctx.price - 195.0).abs() < f64::EPSILON
                    && ctx.articles
                        == vec![
                            "Article from https://news.example/good: Positive sentiment detected"
                                .to_string(),
                            "Article from https://news.example/gone: Content unavailable (HTTP 404)"
                                .to_string(),
                        ]
                    && id.to_string() == "req-7"
            })
            .times(1)
            .returning(|_, _| Ok(output()));

        let outcome = analyzer(market, news, articles, pipeline)
            .analyze("AAPL", "req-7")
            .await;

        let AnalysisOutcome::Analyzed(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.change.unwrap().text(), "+2.63%");
        assert_eq!(report.change.unwrap().class(), "positive");
        assert!(report.chart_html.is_some());
        assert_eq!(report.narrative_text(), "1. Strong demand");
    }

    #[tokio::test]
    async fn test_pipeline_failure_keeps_price_and_chart() {
        let mut market = MockMarketDataSource::new();
        market.expect_intraday().returning(|_| Ok(aapl()));
        let mut news = MockNewsSource::new();
        news.expect_recent_news().returning(|_| Vec::new());
        let mut pipeline = MockAdvicePipeline::new();
        pipeline
            .expect_run()
            .returning(|_, _| Err(PipelineError::Upstream("model overloaded".to_string())));

        let outcome = analyzer(market, news, MockArticleFetcher::new(), pipeline)
            .analyze("AAPL", "req")
            .await;

        let AnalysisOutcome::Analyzed(report) = outcome else {
            panic!("expected a report");
        };
        assert!((report.latest_price - 195.0).abs() < f64::EPSILON);
        assert!(report.chart_html.is_some());
        assert_eq!(report.narrative_text(), "Error during execution: model overloaded");
    }
}
