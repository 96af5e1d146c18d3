//! Article text extraction

use crate::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::fmt;
use std::time::Duration;
use tracing::{instrument, warn};

/// Text shown in place of an article that could not be fetched
pub const FETCH_FAILED_MARKER: &str = "Failed to fetch content";

/// Why an article could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The server answered with something other than 200
    Status(u16),
    /// Connection, timeout or body decoding error
    Transport(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Transport(reason) => write!(f, "{reason}"),
        }
    }
}

/// Outcome of fetching one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleContent {
    /// Paragraph text joined with single spaces
    Text(String),
    Unavailable(FetchFailure),
}

impl ArticleContent {
    /// Article text, or the fixed marker for a failed fetch
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Unavailable(_) => FETCH_FAILED_MARKER,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// Downloads an article and extracts its readable text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Never fails: problems are reported as `ArticleContent::Unavailable`
    async fn fetch(&self, url: &str) -> ArticleContent;
}

/// Fetches articles over HTTP
#[derive(Debug, Clone)]
pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> ArticleContent {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "article request failed");
                return ArticleContent::Unavailable(FetchFailure::Transport(e.to_string()));
            }
        };

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "article not available");
            return ArticleContent::Unavailable(FetchFailure::Status(response.status().as_u16()));
        }

        match response.text().await {
            Ok(html) => ArticleContent::Text(extract_paragraphs(&html)),
            Err(e) => {
                warn!(error = %e, "failed to read article body");
                ArticleContent::Unavailable(FetchFailure::Transport(e.to_string()))
            }
        }
    }
}

/// Text of every `<p>` element, in document order, joined with a space
pub fn extract_paragraphs(html: &str) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };

    Html::parse_document(html)
        .select(&selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
