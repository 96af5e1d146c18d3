//! Lexicon-based sentiment scoring of news articles

use crate::article::{ArticleContent, ArticleFetcher};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Polar words with their base score in `[-1, 1]`
const LEXICON: &[(&str, f64)] = &[
    // general, positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("positive", 0.5),
    ("best", 1.0),
    ("better", 0.5),
    ("happy", 0.8),
    ("strong", 0.4),
    ("stronger", 0.5),
    ("success", 0.6),
    ("successful", 0.7),
    ("impressive", 0.8),
    ("optimistic", 0.6),
    ("confident", 0.5),
    ("favorable", 0.6),
    ("robust", 0.5),
    ("solid", 0.4),
    ("improve", 0.4),
    ("improved", 0.5),
    ("improving", 0.4),
    ("win", 0.6),
    ("wins", 0.6),
    ("love", 0.5),
    ("exciting", 0.6),
    ("healthy", 0.5),
    // financial, positive
    ("gain", 0.5),
    ("gains", 0.5),
    ("gained", 0.5),
    ("rise", 0.4),
    ("rises", 0.4),
    ("rose", 0.4),
    ("rising", 0.4),
    ("rally", 0.6),
    ("rallied", 0.6),
    ("surge", 0.7),
    ("surged", 0.7),
    ("soar", 0.8),
    ("soared", 0.8),
    ("jump", 0.5),
    ("jumped", 0.5),
    ("climb", 0.4),
    ("climbed", 0.4),
    ("growth", 0.5),
    ("grow", 0.4),
    ("grew", 0.4),
    ("profit", 0.5),
    ("profitable", 0.6),
    ("profits", 0.5),
    ("beat", 0.5),
    ("beats", 0.5),
    ("outperform", 0.6),
    ("outperformed", 0.6),
    ("upgrade", 0.6),
    ("upgraded", 0.6),
    ("bullish", 0.7),
    ("record", 0.4),
    ("dividend", 0.2),
    ("upside", 0.5),
    ("boost", 0.5),
    ("boosted", 0.5),
    ("recovery", 0.4),
    ("rebound", 0.4),
    ("momentum", 0.3),
    // general, negative
    ("bad", -0.7),
    ("poor", -0.6),
    ("worse", -0.6),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("negative", -0.5),
    ("weak", -0.5),
    ("weaker", -0.5),
    ("fail", -0.6),
    ("failed", -0.6),
    ("failure", -0.7),
    ("concern", -0.4),
    ("concerns", -0.4),
    ("worried", -0.5),
    ("worry", -0.5),
    ("fear", -0.6),
    ("fears", -0.6),
    ("risk", -0.3),
    ("risky", -0.5),
    ("problem", -0.5),
    ("problems", -0.5),
    ("trouble", -0.6),
    ("difficult", -0.5),
    ("disappointing", -0.7),
    ("disappointed", -0.7),
    ("uncertain", -0.4),
    ("uncertainty", -0.4),
    ("lawsuit", -0.5),
    ("scandal", -0.8),
    ("fraud", -0.9),
    // financial, negative
    ("loss", -0.6),
    ("losses", -0.6),
    ("lost", -0.5),
    ("fall", -0.4),
    ("falls", -0.4),
    ("fell", -0.4),
    ("falling", -0.4),
    ("drop", -0.4),
    ("dropped", -0.4),
    ("decline", -0.5),
    ("declined", -0.5),
    ("declining", -0.5),
    ("plunge", -0.8),
    ("plunged", -0.8),
    ("slump", -0.7),
    ("slumped", -0.7),
    ("tumble", -0.7),
    ("tumbled", -0.7),
    ("crash", -0.9),
    ("selloff", -0.6),
    ("miss", -0.5),
    ("missed", -0.5),
    ("downgrade", -0.6),
    ("downgraded", -0.6),
    ("bearish", -0.7),
    ("recession", -0.7),
    ("layoffs", -0.6),
    ("bankruptcy", -1.0),
    ("debt", -0.3),
    ("volatile", -0.3),
    ("volatility", -0.3),
    ("downside", -0.5),
    ("underperform", -0.6),
    ("cut", -0.3),
    ("cuts", -0.3),
    ("warning", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "hardly", "cannot",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("strongly", 1.4),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("most", 1.2),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("modestly", 0.7),
];

/// Sentiment class derived from polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// `> 0` positive, `< 0` negative, exactly zero neutral
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Self::Positive
        } else if polarity < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive sentiment detected",
            Self::Negative => "Negative sentiment detected",
            Self::Neutral => "Neutral sentiment detected",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scores free text on a negative-to-positive scale
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Polarity in `[-1, 1]`; `0.0` when no polar word is found
    pub fn polarity(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut negated = false;
        let mut intensity = 1.0_f64;

        for token in tokenize(text) {
            if is_negation(&token) {
                negated = true;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token.as_str()) {
                intensity *= factor;
                continue;
            }
            if let Some(&base) = self.lexicon.get(token.as_str()) {
                let mut score = (base * intensity).clamp(-1.0, 1.0);
                if negated {
                    score *= -0.5;
                }
                scores.push(score);
            }
            negated = false;
            intensity = 1.0;
        }

        if scores.is_empty() {
            return 0.0;
        }
        (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_polarity(self.polarity(text))
    }
}

/// Typographic quotes that stand in for `'` in scraped text
const CURLY_APOSTROPHES: [char; 2] = ['\u{2018}', '\u{2019}'];

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !is_token_char(c))
        .map(|token| {
            token
                .replace(CURLY_APOSTROPHES, "'")
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || CURLY_APOSTROPHES.contains(&c)
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

/// A discovered news article and what it says
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    pub url: String,
    pub content: ArticleContent,
    /// `None` when the article could not be fetched
    pub sentiment: Option<Sentiment>,
}

impl NewsArticle {
    /// One-line summary handed to the agents
    pub fn annotation(&self) -> String {
        match (&self.content, self.sentiment) {
            (ArticleContent::Unavailable(reason), _) => {
                format!("Article from {}: Content unavailable ({reason})", self.url)
            }
            (ArticleContent::Text(_), Some(sentiment)) => {
                format!("Article from {}: {}", self.url, sentiment.label())
            }
            (ArticleContent::Text(_), None) => {
                format!("Article from {}: {}", self.url, Sentiment::Neutral.label())
            }
        }
    }
}

/// Fetch every link, in order, and score the ones that could be read
pub async fn annotate_articles(
    fetcher: &dyn ArticleFetcher,
    scorer: &SentimentScorer,
    links: &[String],
) -> Vec<NewsArticle> {
    let mut articles = Vec::with_capacity(links.len());
    for url in links {
        let content = fetcher.fetch(url).await;
        let sentiment = match &content {
            ArticleContent::Text(text) => Some(scorer.classify(text)),
            ArticleContent::Unavailable(_) => None,
        };
        debug!(%url, ?sentiment, "annotated article");
        articles.push(NewsArticle {
            url: url.clone(),
            content,
            sentiment,
        });
    }
    articles
}
