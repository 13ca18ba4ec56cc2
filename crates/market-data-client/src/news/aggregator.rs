use analysis_core::{NewsArticle, NewsSource};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use market_cache::{Clock, SystemClock};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use super::html::HtmlNewsSource;
use super::DEFAULT_SOURCES;
use crate::rate_limiter::SourceRateLimiter;

/// Titles more similar than this are treated as the same story
const DUPLICATE_SIMILARITY: f64 = 0.8;
/// Width of the relevance bands articles are grouped into before recency
const RELEVANCE_BAND: f64 = 0.5;
const RECENCY_WEIGHT: f64 = 3.0;
const MAX_LENGTH_BONUS: f64 = 2.0;
const DEFAULT_REQUESTS_PER_MINUTE: usize = 10;

/// What a news request is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum NewsQuery {
    Company(String),
    Sector(String),
    Market,
    Custom(String),
}

impl NewsQuery {
    pub fn query_string(&self) -> String {
        match self {
            NewsQuery::Company(symbol) => {
                format!("{} stock OR company news", symbol.trim().to_uppercase())
            }
            NewsQuery::Sector(name) => format!("{} sector market analysis", name.trim()),
            NewsQuery::Market => "stock market financial news".to_string(),
            NewsQuery::Custom(query) => query.trim().to_string(),
        }
    }
}

/// An article with the score it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedArticle {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub relevance_score: f64,
}

/// Lowercase, punctuation removed, whitespace collapsed
pub fn simplify_title(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first article of every group of near-identical headlines.
pub fn remove_duplicates(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen: Vec<String> = Vec::new();
    let mut unique = Vec::with_capacity(articles.len());

    for article in articles {
        let simplified = simplify_title(&article.title);
        let duplicate = seen
            .iter()
            .any(|s| strsim::normalized_levenshtein(s, &simplified) > DUPLICATE_SIMILARITY);
        if !duplicate {
            seen.push(simplified);
            unique.push(article);
        }
    }
    unique
}

/// Lowercased search terms; the boolean connectives `or`/`and` are dropped.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t != "or" && t != "and")
        .collect()
}

pub fn source_credibility(source: &str) -> f64 {
    match source {
        "Reuters" => 5.0,
        "MarketWatch" | "Yahoo Finance" => 4.0,
        "Seeking Alpha" | "Investing.com" => 3.0,
        _ => 1.0,
    }
}

/// Term hits plus recency, source credibility and a length bonus
pub fn relevance_score(article: &NewsArticle, terms: &[String], now: DateTime<Utc>) -> f64 {
    let text = format!("{} {}", article.title, article.description).to_lowercase();
    let term_hits: usize = terms
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| text.matches(t.as_str()).count())
        .sum();

    let age = (now - article.published_at).max(Duration::zero());
    let age_hours = age.num_seconds() as f64 / 3600.0;
    let recency = (1.0 - age_hours / 24.0).max(0.0) * RECENCY_WEIGHT;

    // Title and description both count towards length
    let length = (text.chars().count() as f64 / 1000.0).min(MAX_LENGTH_BONUS);

    term_hits as f64 + recency + source_credibility(&article.source) + length
}

fn mentions_any(article: &NewsArticle, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let text = format!("{} {}", article.title, article.description).to_lowercase();
    terms.iter().any(|t| text.contains(t.as_str()))
}

fn rank_order(a: &RankedArticle, b: &RankedArticle) -> Ordering {
    let band = |r: &RankedArticle| (r.relevance_score / RELEVANCE_BAND).floor();
    band(b)
        .total_cmp(&band(a))
        .then_with(|| b.article.published_at.cmp(&a.article.published_at))
}

/// Fans a query out to every source, then merges and ranks the results.
pub struct NewsAggregator {
    sources: Vec<Arc<dyn NewsSource>>,
    limiter: SourceRateLimiter,
    clock: Arc<dyn Clock>,
}

impl NewsAggregator {
    pub fn new(sources: Vec<Arc<dyn NewsSource>>, limiter: SourceRateLimiter) -> Self {
        Self::with_clock(sources, limiter, Arc::new(SystemClock))
    }

    pub fn with_clock(
        sources: Vec<Arc<dyn NewsSource>>,
        limiter: SourceRateLimiter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sources,
            limiter,
            clock,
        }
    }

    /// The five built-in sites at 10 requests per minute each
    pub fn default_sources(client: Client) -> Self {
        let sources = DEFAULT_SOURCES
            .iter()
            .filter_map(|name| HtmlNewsSource::by_name(name, client.clone()))
            .map(|s| Arc::new(s) as Arc<dyn NewsSource>)
            .collect();
        Self::new(sources, SourceRateLimiter::per_minute(DEFAULT_REQUESTS_PER_MINUTE))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Articles matching `query`, most relevant first.
    ///
    /// Rate-limited and failing sources are skipped; no articles at all is
    /// an empty result rather than an error.
    pub async fn fetch_news_articles(&self, query: &str) -> Vec<RankedArticle> {
        let permitted: Vec<&Arc<dyn NewsSource>> = self
            .sources
            .iter()
            .filter(|source| match self.limiter.try_acquire(source.name()) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Skipping news source: {}", e);
                    false
                }
            })
            .collect();

        tracing::info!(
            "Fetching news for {:?} from {} source(s)",
            query,
            permitted.len()
        );

        let results = join_all(permitted.iter().map(|source| source.fetch_articles())).await;

        let mut articles = Vec::new();
        for (source, result) in permitted.iter().zip(results) {
            match result {
                Ok(mut fetched) => {
                    tracing::debug!("{} returned {} articles", source.name(), fetched.len());
                    articles.append(&mut fetched);
                }
                Err(e) => tracing::warn!("Error fetching from {}: {}", source.name(), e),
            }
        }

        let now = self.clock.now();
        let terms = query_terms(query);
        let mut ranked: Vec<RankedArticle> = remove_duplicates(articles)
            .into_iter()
            .filter(|a| mentions_any(a, &terms))
            .map(|article| RankedArticle {
                relevance_score: relevance_score(&article, &terms, now),
                article,
            })
            .collect();
        ranked.sort_by(rank_order);

        tracing::info!("Ranked {} articles for {:?}", ranked.len(), query);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::AnalysisError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use market_cache::ManualClock;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn article(title: &str, description: &str, source: &str, hours_ago: i64) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: description.to_string(),
            url: String::new(),
            published_at: now() - Duration::hours(hours_ago),
            source: source.to_string(),
        }
    }

    struct StaticSource {
        name: &'static str,
        articles: Vec<NewsArticle>,
    }

    #[async_trait]
    impl NewsSource for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_articles(&self) -> Result<Vec<NewsArticle>, AnalysisError> {
            Ok(self.articles.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl NewsSource for FailingSource {
        fn name(&self) -> &str {
            "Broken"
        }

        async fn fetch_articles(&self) -> Result<Vec<NewsArticle>, AnalysisError> {
            Err(AnalysisError::ApiError("HTTP 503".to_string()))
        }
    }

    fn aggregator(sources: Vec<Arc<dyn NewsSource>>, per_minute: usize) -> NewsAggregator {
        let clock = Arc::new(ManualClock::new(now()));
        let limiter = SourceRateLimiter::with_clock(per_minute, Duration::minutes(1), clock.clone());
        NewsAggregator::with_clock(sources, limiter, clock)
    }

    #[test]
    fn test_query_presets() {
        assert_eq!(
            NewsQuery::Company("ogdc".into()).query_string(),
            "OGDC stock OR company news"
        );
        assert_eq!(
            NewsQuery::Sector("Banking".into()).query_string(),
            "Banking sector market analysis"
        );
        assert_eq!(NewsQuery::Market.query_string(), "stock market financial news");
        assert_eq!(
            query_terms("OGDC stock OR company news"),
            vec!["ogdc", "stock", "company", "news"]
        );
    }

    #[test]
    fn test_simplify_title() {
        assert_eq!(simplify_title("  Stocks RALLY: KSE-100 up!  "), "stocks rally kse100 up");
    }

    #[test]
    fn test_remove_duplicates_keeps_first_seen() {
        let articles = vec![
            article("PSX closes higher on bank rally", "a", "Reuters", 1),
            article("PSX closes higher on bank rally!", "b", "MarketWatch", 1),
            article("Oil prices slip in Asia", "c", "Reuters", 1),
        ];
        let unique = remove_duplicates(articles);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].source, "Reuters");
        assert_eq!(unique[1].title, "Oil prices slip in Asia");
    }

    #[test]
    fn test_relevance_components() {
        let terms = query_terms("bank");
        let fresh = article("Bank profits", "bank margins widen", "Reuters", 0);
        // 2 hits + full recency + Reuters + 31 chars of text
        assert!((relevance_score(&fresh, &terms, now()) - 10.031).abs() < 1e-9);

        let stale = article("Bank profits", "", "Unknown Wire", 48);
        assert!((relevance_score(&stale, &terms, now()) - 2.013).abs() < 1e-9);

        let long = article("x", &"y".repeat(5000), "Unknown Wire", 48);
        assert!((relevance_score(&long, &[], now()) - 3.0).abs() < 1e-9);

        let long_title = article(&"t".repeat(498), "y", "Unknown Wire", 48);
        assert!((relevance_score(&long_title, &[], now()) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_future_timestamps_get_full_recency() {
        let future = article("x", "", "Unknown Wire", -5);
        assert!((relevance_score(&future, &[], now()) - 4.002).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fetch_filters_and_ranks() {
        let reuters = StaticSource {
            name: "Reuters",
            articles: vec![
                article("Cement stocks slide", "cement demand falls", "Reuters", 2),
                article("Weather update", "rain expected", "Reuters", 1),
            ],
        };
        let wire = StaticSource {
            name: "Local Wire",
            articles: vec![article("Cement output rises", "", "Local Wire", 1)],
        };
        let agg = aggregator(
            vec![Arc::new(reuters), Arc::new(wire), Arc::new(FailingSource)],
            10,
        );

        let ranked = agg.fetch_news_articles("cement").await;
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].article.source, "Reuters");
        assert!(ranked[0].relevance_score > ranked[1].relevance_score);
    }

    #[tokio::test]
    async fn test_rate_limited_source_is_skipped() {
        let source = StaticSource {
            name: "Reuters",
            articles: vec![article("Market update", "stocks", "Reuters", 1)],
        };
        let agg = aggregator(vec![Arc::new(source)], 1);

        assert_eq!(agg.fetch_news_articles("market").await.len(), 1);
        assert!(agg.fetch_news_articles("market").await.is_empty());
    }

    #[tokio::test]
    async fn test_no_sources_is_empty() {
        let agg = aggregator(Vec::new(), 10);
        assert!(agg.fetch_news_articles("anything").await.is_empty());
    }
}
