//! Test utilities for web integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::NaiveDateTime;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stock_advisor::market::TIMESTAMP_FORMAT;
use stock_advisor::web::{SessionStore, StaticCredentialStore};
use stock_advisor::{
    AdvicePipeline, AppState, ArticleContent, ArticleFetcher, MarketDataSource, NewsSource,
    PipelineError, PipelineOutput, PricePoint, PriceSeries, StockAnalyzer, StockContext,
    SymbolCatalog, create_router,
};
use tempfile::NamedTempFile;

pub const SECRET: &str = "an-integration-test-secret-that-is-long-enough-for-signing";

/// Serves AAPL closes 190.0 (oldest) through 195.0 (latest); nothing else
pub struct FakeMarket;

#[async_trait]
impl MarketDataSource for FakeMarket {
    async fn intraday(&self, symbol: &str) -> stock_advisor::Result<PriceSeries> {
        if symbol != "AAPL" {
            return Ok(PriceSeries::empty(symbol));
        }
        let point = |ts: &str, close: f64| PricePoint {
            timestamp: NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).expect("timestamp"),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        };
        Ok(PriceSeries::new(
            symbol,
            vec![
                point("2024-05-01 09:35:00", 190.0),
                point("2024-05-01 12:00:00", 192.5),
                point("2024-05-01 16:00:00", 195.0),
            ],
        ))
    }
}

#[derive(Default)]
pub struct FakeNews {
    pub calls: AtomicUsize,
}

#[async_trait]
impl NewsSource for FakeNews {
    async fn recent_news(&self, _symbol: &str) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec!["https://news.example/apple".to_string()]
    }
}

pub struct FakeArticles;

#[async_trait]
impl ArticleFetcher for FakeArticles {
    async fn fetch(&self, _url: &str) -> ArticleContent {
        ArticleContent::Text("Apple posted strong growth and record profit".to_string())
    }
}

/// Answers with a fixed narrative, or fails when `error` is set
#[derive(Default)]
pub struct FakePipeline {
    pub error: Option<String>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AdvicePipeline for FakePipeline {
    async fn run(
        &self,
        _context: &StockContext,
        _request_id: &str,
    ) -> Result<PipelineOutput, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(PipelineError::Upstream(message.clone())),
            None => Ok(PipelineOutput {
                classification: "Bullish".to_string(),
                recommendation: "Buy".to_string(),
                insights: "1. Demand for the new phone is strong".to_string(),
            }),
        }
    }
}

/// Analyzer over the fakes with the given pipeline
pub fn analyzer(pipeline: Arc<FakePipeline>) -> StockAnalyzer {
    StockAnalyzer::new(
        Arc::new(FakeMarket),
        Arc::new(FakeNews::default()),
        Arc::new(FakeArticles),
        pipeline,
    )
}

pub struct TestApp {
    pub server: TestServer,
    pub news: Arc<FakeNews>,
    pub pipeline: Arc<FakePipeline>,
    /// Shared with the router's state
    pub sessions: SessionStore,
    _catalog: NamedTempFile,
}

pub struct TestAppBuilder {
    require_login: bool,
    pipeline_error: Option<String>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            require_login: true,
            pipeline_error: None,
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Log in as the configured user; cookies are kept for later requests
    pub async fn login(&self) {
        self.server
            .post("/")
            .form(&[("username", "alice"), ("password", "wonderland")])
            .await;
    }
}

impl TestAppBuilder {
    pub fn require_login(mut self, require: bool) -> Self {
        self.require_login = require;
        self
    }

    pub fn pipeline_error(mut self, message: &str) -> Self {
        self.pipeline_error = Some(message.to_string());
        self
    }

    pub fn build(self) -> TestApp {
        let mut catalog = NamedTempFile::new().expect("catalog file");
        writeln!(catalog, "symbol,name\nAAPL,Apple\nMSFT,Microsoft").expect("write catalog");

        let news = Arc::new(FakeNews::default());
        let pipeline = Arc::new(FakePipeline {
            error: self.pipeline_error,
            calls: AtomicUsize::new(0),
        });
        let analyzer = StockAnalyzer::new(
            Arc::new(FakeMarket),
            news.clone(),
            Arc::new(FakeArticles),
            pipeline.clone(),
        );

        let state = tokio_test::assert_ok!(AppState::new(
            analyzer,
            SymbolCatalog::new(catalog.path()),
            Arc::new(StaticCredentialStore::new([("alice", "wonderland")])),
            SECRET,
            self.require_login,
        ));

        let sessions = state.sessions.clone();
        let mut server = TestServer::new(create_router(state)).expect("start test server");
        server.save_cookies();

        TestApp {
            server,
            news,
            pipeline,
            sessions,
            _catalog: catalog,
        }
    }
}
