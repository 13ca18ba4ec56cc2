use async_trait::async_trait;
use crate::{AnalysisError, NewsArticle, StockQuote};

/// Provider of the exchange listing the sector view is built from
#[async_trait]
pub trait StockListSource: Send + Sync {
    /// Key the fetched list is cached under (usually the listing URL)
    fn cache_key(&self) -> &str;

    async fn fetch_stock_list(&self) -> Result<Vec<StockQuote>, AnalysisError>;
}

/// One outlet articles can be pulled from
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Display name, also used for rate limiting and credibility scoring
    fn name(&self) -> &str;

    async fn fetch_articles(&self) -> Result<Vec<NewsArticle>, AnalysisError>;
}
