//! HTTP data sources: the exchange stock-list scraper and the financial news
//! sources, plus the per-source rate limiter and news aggregation.

use analysis_core::AnalysisError;
use reqwest::Client;
use std::time::Duration;

pub mod news;
pub mod rate_limiter;
pub mod stock_list;

pub use news::{
    HtmlNewsSource, NewsAggregator, NewsQuery, RankedArticle, RssNewsSource, DEFAULT_SOURCES,
};
pub use rate_limiter::SourceRateLimiter;
pub use stock_list::{
    fallback_stock_list, parse_number, parse_stock_table, StockListClient, DEFAULT_STOCK_LIST_URL,
};

const USER_AGENT: &str = concat!("market-pulse/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client; the timeout applies to every request made with it.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` and return the body, mapping transport failures and non-2xx
/// statuses to [`AnalysisError::ApiError`].
pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String, AnalysisError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AnalysisError::ApiError(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    response
        .text()
        .await
        .map_err(|e| AnalysisError::ApiError(e.to_string()))
}
