//! Serper news search client

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const BASE_URL: &str = "https://google.serper.dev";

/// Number of results requested per search
pub const NEWS_RESULTS: usize = 10;

/// Source of recent news links
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Links to news about `symbol` from the last day
    ///
    /// Failures are logged and produce an empty list.
    async fn recent_news(&self, symbol: &str) -> Vec<String>;
}

/// Serper API client
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct NewsQuery {
    q: String,
    num: usize,
    /// Time window: past day
    tbs: &'static str,
}

/// Items stay untyped so one odd entry cannot fail the whole response
#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<Value>,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, symbol: &str) -> Result<NewsResponse> {
        let query = NewsQuery {
            q: format!("{symbol} stock news"),
            num: NEWS_RESULTS,
            tbs: "qdr:d",
        };

        let response = self
            .client
            .post(format!("{}/news", self.base_url))
            .header("X-API-KEY", &self.api_key)
            .json(&query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl NewsSource for SerperClient {
    #[instrument(skip(self))]
    async fn recent_news(&self, symbol: &str) -> Vec<String> {
        match self.search(symbol).await {
            Ok(body) => {
                let links: Vec<String> = body
                    .news
                    .into_iter()
                    .filter_map(|item| {
                        item.get("link")
                            .and_then(Value::as_str)
                            .map(|link| link.trim().to_string())
                    })
                    .filter(|link| !link.is_empty())
                    .take(NEWS_RESULTS)
                    .collect();
                debug!(count = links.len(), "found news links");
                links
            }
            Err(e) => {
                warn!(error = %e, "news search failed");
                Vec::new()
            }
        }
    }
}
