//! Market analytics service: wires the stock-list and news fetchers, their
//! caches and the analytics crates into one handle the CLI talks to.

use analysis_core::{
    FinancialRecord, NewsSource, SectorSnapshot, SentimentResult, Signal, StockListSource,
    StockQuote,
};
use chrono::Duration;
use fundamental_analysis::{summarize_report, FundamentalAnalysisEngine, RatioFamily, RatioReport};
use market_cache::{Clock, SystemClock, TtlCache};
use market_data_client::{
    fallback_stock_list, http_client, HtmlNewsSource, NewsAggregator, NewsQuery, RankedArticle,
    SourceRateLimiter, StockListClient,
};
use sector_signals::{group_by_sector, top_movers, SectorKeywords, SectorRecord, SignalAggregator, TopMovers};
use sentiment_analysis::{
    analyze_news_impact, extract_entities, market_mood, ArticleInsight, MoodSummary, SentimentScorer,
};
use serde::Serialize;
use std::sync::Arc;

pub mod config;
pub use config::AnalyticsConfig;

/// Sentiment of a free-form text plus the companies it names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub sentiment: SentimentResult,
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsImpact {
    pub articles: Vec<ArticleInsight>,
    pub mood: MoodSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyInsight {
    pub family: RatioFamily,
    pub summary: String,
}

/// Computed ratios with one insight line per family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioAnalysis {
    pub ratios: RatioReport,
    pub insights: Vec<FamilyInsight>,
}

pub struct MarketAnalytics {
    stock_source: Arc<dyn StockListSource>,
    news: NewsAggregator,
    /// Stock lists keyed by the source's cache key
    stock_cache: TtlCache<Vec<StockQuote>>,
    /// Ranked articles keyed `news-{query}`
    news_cache: TtlCache<Vec<RankedArticle>>,
    scorer: SentimentScorer,
    keywords: SectorKeywords,
    signal_aggregator: SignalAggregator,
    fundamentals: FundamentalAnalysisEngine,
}

impl MarketAnalytics {
    /// Live HTTP sources as configured.
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        let client = http_client(std::time::Duration::from_secs(config.http_timeout_secs));
        let stock_source = Arc::new(StockListClient::new(client.clone(), config.stock_list_url.clone()));

        let sources = config
            .news_sources
            .iter()
            .filter_map(|name| {
                let source = HtmlNewsSource::by_name(name, client.clone());
                if source.is_none() {
                    tracing::warn!("Unknown news source {:?} ignored", name);
                }
                source
            })
            .map(|s| Arc::new(s) as Arc<dyn NewsSource>)
            .collect();
        let news = NewsAggregator::new(
            sources,
            SourceRateLimiter::per_minute(config.news_rate_limit_per_min),
        );

        Self::with_sources(stock_source, news, config, Arc::new(SystemClock))
    }

    /// Explicit sources and cache clock.
    pub fn with_sources(
        stock_source: Arc<dyn StockListSource>,
        news: NewsAggregator,
        config: &AnalyticsConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ttl = |secs: u64| Duration::seconds(secs.min(u64::from(u32::MAX)) as i64);
        let sentiment_cache = Arc::new(TtlCache::with_clock(
            ttl(config.sentiment_cache_ttl_secs),
            clock.clone(),
        ));

        Self {
            stock_source,
            news,
            stock_cache: TtlCache::with_clock(ttl(config.stock_cache_ttl_secs), clock.clone()),
            news_cache: TtlCache::with_clock(ttl(config.news_cache_ttl_secs), clock),
            scorer: SentimentScorer::with_cache(sentiment_cache),
            keywords: SectorKeywords::default(),
            signal_aggregator: SignalAggregator::new(config.classification()),
            fundamentals: FundamentalAnalysisEngine::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: SectorKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn news_sources(&self) -> Vec<&str> {
        self.news.source_names()
    }

    /// Cached listing, or the static fallback when the fetch fails.
    ///
    /// The fallback is not cached, so the next call tries the source again.
    pub async fn stock_list(&self) -> Vec<StockQuote> {
        let key = self.stock_source.cache_key();
        match self
            .stock_cache
            .get_or_fetch(key, || self.stock_source.fetch_stock_list())
            .await
        {
            Ok(stocks) => stocks,
            Err(e) => {
                tracing::warn!("Error fetching stock list, using fallback list: {}", e);
                fallback_stock_list()
            }
        }
    }

    pub async fn sector_snapshots(&self) -> Vec<SectorSnapshot> {
        let stocks = self.stock_list().await;
        group_by_sector(&self.keywords, &stocks)
    }

    pub async fn fetch_sector_list(&self) -> Vec<SectorRecord> {
        self.sector_snapshots()
            .await
            .iter()
            .map(SectorRecord::from_snapshot)
            .collect()
    }

    /// Breadth, rotation, momentum and concentration, in that order
    pub async fn signals(&self) -> Vec<Signal> {
        let sectors = self.fetch_sector_list().await;
        tracing::info!("Computing market signals over {} sectors", sectors.len());
        self.signal_aggregator.compute_signals(&sectors)
    }

    pub async fn top_movers(&self, sector: &str) -> TopMovers {
        let stocks = self.stock_list().await;
        top_movers(&self.keywords, sector, &stocks)
    }

    pub async fn news(&self, query: &NewsQuery) -> Vec<RankedArticle> {
        let query = query.query_string();
        let key = format!("news-{}", query);
        if let Some(hit) = self.news_cache.get(&key) {
            tracing::debug!("Returning cached news for {:?}", query);
            return hit;
        }

        let articles = self.news.fetch_news_articles(&query).await;
        // Empty results are retried on the next call
        if articles.is_empty() {
            tracing::warn!("No news articles for {:?}, not caching", query);
        } else {
            self.news_cache.set(key, articles.clone());
        }
        articles
    }

    /// Per-article sentiment for a news query and the overall mood
    pub async fn news_impact(&self, query: &NewsQuery) -> NewsImpact {
        let articles: Vec<_> = self
            .news(query)
            .await
            .into_iter()
            .map(|ranked| ranked.article)
            .collect();
        let insights = analyze_news_impact(&self.scorer, &articles);
        let mood = market_mood(&insights);
        NewsImpact {
            articles: insights,
            mood,
        }
    }

    pub fn analyze_text(&self, text: &str) -> TextAnalysis {
        TextAnalysis {
            sentiment: self.scorer.score(text),
            entities: extract_entities(text),
        }
    }

    pub fn compute_ratios(&self, record: &FinancialRecord) -> RatioAnalysis {
        let ratios = self.fundamentals.compute_ratios(record);
        let insights = summarize_report(&ratios)
            .into_iter()
            .map(|(family, summary)| FamilyInsight { family, summary })
            .collect();
        RatioAnalysis { ratios, insights }
    }
}
