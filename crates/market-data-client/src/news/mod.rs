//! Financial news: scraped HTML sites, RSS feeds and the aggregator that
//! merges, de-duplicates and ranks their articles.

mod aggregator;
mod feed;
mod html;

pub use aggregator::{
    query_terms, relevance_score, remove_duplicates, simplify_title, source_credibility,
    NewsAggregator, NewsQuery, RankedArticle,
};
pub use feed::RssNewsSource;
pub use html::{ArticleSelectors, HtmlNewsSource, TimestampFormat, TimestampSelector};

/// Built-in sites, in the order they are queried
pub const DEFAULT_SOURCES: [&str; 5] = [
    "MarketWatch",
    "Yahoo Finance",
    "Reuters",
    "Investing.com",
    "Seeking Alpha",
];
