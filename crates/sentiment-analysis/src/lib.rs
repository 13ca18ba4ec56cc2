//! Lexicon-based sentiment scoring for market news.
//!
//! Text is tokenized, each token looked up in an AFINN-scale lexicon, and the
//! polarity sum normalised by token count. A negation word within three
//! tokens before a hit flips that hit's sign.

pub mod entities;
pub mod lexicon;
pub mod news;
pub mod scorer;

pub use entities::extract_entities;
pub use lexicon::Lexicon;
pub use news::{analyze_news_impact, market_mood, ArticleInsight, MarketMood, MoodSummary};
pub use scorer::{cache_key, score_sentiment, tokenize, SentimentScorer};
